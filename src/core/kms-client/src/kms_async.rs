//! The asynchronous KMS surface.

use kms_model::{
    CreateKeyRequest, CreateKeyResult, GenerateRandomRequest, GenerateRandomResult,
    ListAliasesRequest, ListAliasesResult, ListKeysRequest, ListKeysResult, RetireGrantRequest,
    RetireGrantResult,
};

use crate::future::{BoxedHandler, KmsFuture};
use crate::kms::KmsCall;

/// Submits any request generically.
///
/// Implementing `AsyncDispatch` provides [`KmsAsync`] through a blanket
/// impl. Both the plain and the handler-taking methods of `KmsAsync` go
/// through [`submit`](Self::submit), so there is one completion path.
pub trait AsyncDispatch: Send + Sync {
    /// Starts executing `request`, notifying `handler` when it completes.
    fn submit<R: KmsCall>(&self, request: R, handler: Option<BoxedHandler<R>>)
        -> KmsFuture<R::Output>;
}

macro_rules! define_kms_async {
    ($( ($variant:ident, $method:ident, $req:ident, $res:ident, [$($err:ident),* $(,)?], $doc:literal) ),* $(,)?) => {
        pastey::paste! {
            /// Asynchronous KMS surface: every operation returns a [`KmsFuture`].
            ///
            /// The `_with_handler` variants also notify an
            /// [`AsyncHandler`](crate::AsyncHandler) exactly once on completion.
            /// There is no ordering guarantee between concurrent calls.
            pub trait KmsAsync: Send + Sync {
                $(
                    #[doc = $doc]
                    #[doc = ""]
                    #[doc = concat!("Documented rejections:", $(" `", stringify!($err), "`"),*, ".")]
                    fn [<$method _async>](&self, request: kms_model::$req) -> KmsFuture<kms_model::$res>;

                    #[doc = $doc]
                    #[doc = ""]
                    #[doc = "Notifies `handler` exactly once when the call completes."]
                    fn [<$method _async_with_handler>](
                        &self,
                        request: kms_model::$req,
                        handler: BoxedHandler<kms_model::$req>,
                    ) -> KmsFuture<kms_model::$res>;
                )*

                /// `CreateKey` with a default request.
                fn create_key_default_async(&self) -> KmsFuture<CreateKeyResult> {
                    self.create_key_async(CreateKeyRequest::default())
                }

                /// `GenerateRandom` with a default request.
                fn generate_random_default_async(&self) -> KmsFuture<GenerateRandomResult> {
                    self.generate_random_async(GenerateRandomRequest::default())
                }

                /// `ListAliases` with a default request (first page).
                fn list_aliases_default_async(&self) -> KmsFuture<ListAliasesResult> {
                    self.list_aliases_async(ListAliasesRequest::default())
                }

                /// `ListKeys` with a default request (first page).
                fn list_keys_default_async(&self) -> KmsFuture<ListKeysResult> {
                    self.list_keys_async(ListKeysRequest::default())
                }

                /// `RetireGrant` with a default request.
                fn retire_grant_default_async(&self) -> KmsFuture<RetireGrantResult> {
                    self.retire_grant_async(RetireGrantRequest::default())
                }
            }

            impl<A: AsyncDispatch> KmsAsync for A {
                $(
                    fn [<$method _async>](&self, request: kms_model::$req) -> KmsFuture<kms_model::$res> {
                        self.submit(request, None)
                    }

                    fn [<$method _async_with_handler>](
                        &self,
                        request: kms_model::$req,
                        handler: BoxedHandler<kms_model::$req>,
                    ) -> KmsFuture<kms_model::$res> {
                        self.submit(request, Some(handler))
                    }
                )*
            }
        }
    };
}

kms_model::for_each_operation!(define_kms_async);
