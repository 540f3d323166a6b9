//! Registration against a directory of already-known customers.

use async_trait::async_trait;

use keelcrm_core::{Error, Outcome};

use crate::customer::{Customer, CustomerId};
use crate::customer_number::CustomerNumber;
use crate::email::EmailAddress;

/// Lookup seam over whatever store holds existing customers.
///
/// Implementations are expected to be cheap to query; `register` only calls
/// them once the candidate customer has already passed local validation.
#[async_trait]
pub trait CustomerDirectory: Send + Sync {
    async fn email_in_use(&self, email: &EmailAddress) -> Result<bool, Error>;
}

/// Register a new customer.
///
/// Local validation runs first; the directory is never queried for a
/// candidate that is invalid on its own. A directory hit maps to a conflict,
/// a directory failure passes through unchanged.
pub async fn register(
    directory: &dyn CustomerDirectory,
    id: CustomerId,
    number: CustomerNumber,
    first_name: &str,
    last_name: &str,
    email: &str,
) -> Outcome<Customer> {
    Customer::create(id, number, first_name, last_name, email)
        .and_then_async(|customer| async move {
            match directory.email_in_use(customer.email()).await {
                Ok(true) => Outcome::failure(
                    Error::conflict("email address is already registered").with_field("email"),
                ),
                Ok(false) => Outcome::success(customer),
                Err(error) => Outcome::failure(error),
            }
        })
        .await
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use keelcrm_core::{AggregateId, ErrorKind};

    use super::*;

    struct StubDirectory {
        taken: Vec<String>,
        fail: bool,
        queries: AtomicUsize,
    }

    impl StubDirectory {
        fn empty() -> Self {
            Self {
                taken: Vec::new(),
                fail: false,
                queries: AtomicUsize::new(0),
            }
        }

        fn with_taken(email: &str) -> Self {
            Self {
                taken: vec![email.to_string()],
                ..Self::empty()
            }
        }

        fn failing() -> Self {
            Self {
                fail: true,
                ..Self::empty()
            }
        }
    }

    #[async_trait]
    impl CustomerDirectory for StubDirectory {
        async fn email_in_use(&self, email: &EmailAddress) -> Result<bool, Error> {
            self.queries.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(Error::unexpected("directory is unavailable"));
            }
            Ok(self.taken.iter().any(|taken| taken == email.value()))
        }
    }

    fn test_id() -> CustomerId {
        CustomerId::new(AggregateId::new())
    }

    fn test_number() -> CustomerNumber {
        CustomerNumber::create(2024, 42).into_value()
    }

    #[tokio::test]
    async fn registers_a_customer_with_an_unused_email() {
        let directory = StubDirectory::empty();

        let customer = register(&directory, test_id(), test_number(), "John", "Doe", "john@x.com")
            .await
            .into_value();

        assert_eq!(customer.email().value(), "john@x.com");
        assert_eq!(directory.queries.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn a_taken_email_is_a_conflict() {
        let directory = StubDirectory::with_taken("john@x.com");

        let outcome =
            register(&directory, test_id(), test_number(), "John", "Doe", "John@X.com ").await;

        assert!(outcome.is_failure());
        assert_eq!(outcome.errors()[0].kind(), ErrorKind::Conflict);
        assert_eq!(outcome.errors()[0].field(), Some("email"));
    }

    #[tokio::test]
    async fn an_invalid_candidate_never_reaches_the_directory() {
        let directory = StubDirectory::empty();

        let outcome =
            register(&directory, test_id(), test_number(), "John", "Doe", "not-an-email").await;

        assert!(outcome.is_failure());
        assert_eq!(directory.queries.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn directory_failures_pass_through_unchanged() {
        let directory = StubDirectory::failing();

        let outcome =
            register(&directory, test_id(), test_number(), "John", "Doe", "john@x.com").await;

        assert_eq!(outcome.errors()[0].kind(), ErrorKind::Unexpected);
        assert_eq!(outcome.errors()[0].message(), "directory is unavailable");
    }
}
