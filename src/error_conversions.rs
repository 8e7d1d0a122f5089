//! Error conversion glue between layers.
//!
//! The domain layer must not depend on service/repository error types, but
//! callers still want `?` to work across those boundaries.

use crate::domain::types::TypeConstraintError;
use crate::repository::errors::RepositoryError;

impl From<TypeConstraintError> for RepositoryError {
    fn from(val: TypeConstraintError) -> Self {
        RepositoryError::ValidationError(val.to_string())
    }
}

#[cfg(feature = "server")]
mod server {
    use crate::forms::products::ProductFormError;
    use crate::services::ServiceError;
    use crate::services::products::SubmitError;

    impl From<ProductFormError> for ServiceError {
        fn from(val: ProductFormError) -> Self {
            ServiceError::Form(val.to_string())
        }
    }

    impl From<SubmitError> for ServiceError {
        fn from(val: SubmitError) -> Self {
            match val {
                SubmitError::Validation(e) => e.into(),
                _ => ServiceError::Internal,
            }
        }
    }
}
