//! `keelcrm-customers` — customer aggregate and its value objects.

pub mod customer;
pub mod customer_number;
pub mod directory;
pub mod email;

pub use customer::{Address, AddressId, Customer, CustomerEvent, CustomerId, CustomerStatus};
pub use customer_number::CustomerNumber;
pub use directory::{CustomerDirectory, register};
pub use email::EmailAddress;
