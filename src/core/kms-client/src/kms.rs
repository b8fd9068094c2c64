//! The synchronous KMS surface.

use kms_model::{
    CreateKeyRequest, CreateKeyResult, GenerateRandomRequest, GenerateRandomResult, KmsError,
    KmsRequest, ListAliasesRequest, ListAliasesResult, ListKeysRequest, ListKeysResult,
    RetireGrantRequest, RetireGrantResult,
};

/// Executes any request generically.
///
/// Implementing `Dispatch` provides [`Kms`] through a blanket impl, so a
/// client only has to say how *a* request is executed, not each of them.
pub trait Dispatch: Send + Sync {
    /// Executes `request` and returns its paired result.
    fn dispatch<R: KmsCall>(&self, request: R) -> Result<R::Output, KmsError>;
}

/// Routes a request to its method on a [`Kms`] trait object.
pub trait KmsCall: KmsRequest {
    /// Calls the method of `kms` that handles this request type.
    fn call(self, kms: &dyn Kms) -> Result<Self::Output, KmsError>;
}

macro_rules! define_kms {
    ($( ($variant:ident, $method:ident, $req:ident, $res:ident, [$($err:ident),* $(,)?], $doc:literal) ),* $(,)?) => {
        /// Synchronous KMS surface: one blocking method per remote operation.
        ///
        /// Every method takes the operation's request and returns its result,
        /// or the service rejection unchanged.
        pub trait Kms: Send + Sync {
            $(
                #[doc = $doc]
                #[doc = ""]
                #[doc = concat!("Documented rejections:", $(" `", stringify!($err), "`"),*, ".")]
                fn $method(&self, request: kms_model::$req) -> Result<kms_model::$res, KmsError>;
            )*

            /// `CreateKey` with a default request.
            fn create_key_default(&self) -> Result<CreateKeyResult, KmsError> {
                self.create_key(CreateKeyRequest::default())
            }

            /// `GenerateRandom` with a default request.
            fn generate_random_default(&self) -> Result<GenerateRandomResult, KmsError> {
                self.generate_random(GenerateRandomRequest::default())
            }

            /// `ListAliases` with a default request (first page).
            fn list_aliases_default(&self) -> Result<ListAliasesResult, KmsError> {
                self.list_aliases(ListAliasesRequest::default())
            }

            /// `ListKeys` with a default request (first page).
            fn list_keys_default(&self) -> Result<ListKeysResult, KmsError> {
                self.list_keys(ListKeysRequest::default())
            }

            /// `RetireGrant` with a default request.
            fn retire_grant_default(&self) -> Result<RetireGrantResult, KmsError> {
                self.retire_grant(RetireGrantRequest::default())
            }
        }

        impl<D: Dispatch> Kms for D {
            $(
                fn $method(&self, request: kms_model::$req) -> Result<kms_model::$res, KmsError> {
                    self.dispatch(request)
                }
            )*
        }

        $(
            impl KmsCall for kms_model::$req {
                fn call(self, kms: &dyn Kms) -> Result<Self::Output, KmsError> {
                    kms.$method(self)
                }
            }
        )*
    };
}

kms_model::for_each_operation!(define_kms);
