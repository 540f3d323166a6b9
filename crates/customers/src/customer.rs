use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use keelcrm_core::{
    AggregateId, AggregateRoot, Entity, Error, EventLog, Mutate, Outcome, Rule, rules,
};
use keelcrm_events::Event;

use crate::customer_number::CustomerNumber;
use crate::email::EmailAddress;

pub const MAX_NAME_LEN: usize = 100;
pub const MAX_ADDRESSES: usize = 10;
/// Oldest accepted age for a date of birth, in years.
pub const MAX_AGE_YEARS: i32 = 130;

/// Customer identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomerId(pub AggregateId);

impl CustomerId {
    pub fn new(id: AggregateId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for CustomerId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Identifier of an address owned by a customer.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AddressId(pub AggregateId);

impl AddressId {
    pub fn new(id: AggregateId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for AddressId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Postal address, a child entity of the customer aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub id: AddressId,
    pub street: String,
    pub city: String,
    pub postal_code: String,
}

impl Entity for Address {
    type Id = AddressId;

    fn id(&self) -> &AddressId {
        &self.id
    }
}

/// Customer status lifecycle.
///
/// A closed union with value equality; `Blocked` carries its reason as
/// associated data rather than a parallel lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CustomerStatus {
    Active,
    Inactive,
    Blocked { reason: String },
}

impl CustomerStatus {
    /// Invariant helper: only active customers may transact.
    pub fn can_transact(&self) -> bool {
        matches!(self, CustomerStatus::Active)
    }
}

/// Aggregate root: Customer.
///
/// No public constructor: [`Customer::create`] validates every part before an
/// instance exists, and every mutator stages its checks and writes through a
/// change pipeline, so readers never observe a half-applied change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Customer {
    id: CustomerId,
    number: CustomerNumber,
    first_name: String,
    last_name: String,
    email: EmailAddress,
    date_of_birth: Option<NaiveDate>,
    status: CustomerStatus,
    addresses: Vec<Address>,
    version: u64,
    events: EventLog<CustomerEvent>,
}

impl Customer {
    /// Factory: validates the email value object, then the name invariants,
    /// and only then constructs the instance and records `Created`.
    pub fn create(
        id: CustomerId,
        number: CustomerNumber,
        first_name: &str,
        last_name: &str,
        email: &str,
    ) -> Outcome<Customer> {
        EmailAddress::parse(email).and_then(|email| {
            let first_name = first_name.trim();
            let last_name = last_name.trim();
            Rule::new()
                .must(
                    || rules::not_empty(first_name),
                    Error::validation("first name must not be empty").with_field("first_name"),
                )
                .must(
                    || rules::max_len(first_name, MAX_NAME_LEN),
                    Error::validation("first name is too long").with_field("first_name"),
                )
                .must(
                    || rules::not_empty(last_name),
                    Error::validation("last name must not be empty").with_field("last_name"),
                )
                .must(
                    || rules::max_len(last_name, MAX_NAME_LEN),
                    Error::validation("last name is too long").with_field("last_name"),
                )
                .check()
                .map(|()| {
                    let mut customer = Customer {
                        id,
                        number,
                        first_name: first_name.to_string(),
                        last_name: last_name.to_string(),
                        email,
                        date_of_birth: None,
                        status: CustomerStatus::Active,
                        addresses: Vec::new(),
                        version: 1,
                        events: EventLog::new(),
                    };
                    customer.events.record(CustomerEvent::Created(Created {
                        customer_id: id,
                        number,
                        email: customer.email.clone(),
                        occurred_at: Utc::now(),
                    }));
                    customer
                })
        })
    }

    pub fn id_typed(&self) -> CustomerId {
        self.id
    }

    pub fn number(&self) -> CustomerNumber {
        self.number
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    pub fn date_of_birth(&self) -> Option<NaiveDate> {
        self.date_of_birth
    }

    pub fn status(&self) -> &CustomerStatus {
        &self.status
    }

    pub fn addresses(&self) -> &[Address] {
        &self.addresses
    }

    pub fn can_transact(&self) -> bool {
        self.status.can_transact()
    }

    /// Rename: both fields move together as one atomic unit.
    pub fn change_name(&mut self, first_name: &str, last_name: &str) -> Outcome<()> {
        let first_name = first_name.trim().to_string();
        let last_name = last_name.trim().to_string();
        self.change()
            .ensure(
                |_| rules::not_empty(&first_name),
                Error::validation("first name must not be empty").with_field("first_name"),
            )
            .ensure(
                |_| rules::max_len(&first_name, MAX_NAME_LEN),
                Error::validation("first name is too long").with_field("first_name"),
            )
            .ensure(
                |_| rules::not_empty(&last_name),
                Error::validation("last name must not be empty").with_field("last_name"),
            )
            .ensure(
                |_| rules::max_len(&last_name, MAX_NAME_LEN),
                Error::validation("last name is too long").with_field("last_name"),
            )
            .set(move |c| {
                c.first_name = first_name;
                c.last_name = last_name;
            })
            .record_with(|c| {
                CustomerEvent::NameChanged(NameChanged {
                    customer_id: c.id,
                    first_name: c.first_name.clone(),
                    last_name: c.last_name.clone(),
                    occurred_at: Utc::now(),
                })
            })
            .apply()
    }

    /// Setting the same address again is an inert no-op (no event).
    pub fn change_email(&mut self, email: EmailAddress) -> Outcome<()> {
        self.change()
            .when(|c| c.email != email)
            .set(move |c| c.email = email)
            .record_with(|c| {
                CustomerEvent::EmailChanged(EmailChanged {
                    customer_id: c.id,
                    email: c.email.clone(),
                    occurred_at: Utc::now(),
                })
            })
            .apply()
    }

    /// `today` is passed in so callers own the clock.
    pub fn change_birth_date(&mut self, date_of_birth: NaiveDate, today: NaiveDate) -> Outcome<()> {
        self.change()
            .ensure(
                move |_| rules::not_in_future(date_of_birth, today),
                Error::validation("date of birth must not be in the future")
                    .with_field("date_of_birth"),
            )
            .ensure(
                move |_| rules::greater_than(date_of_birth.year(), today.year() - MAX_AGE_YEARS),
                Error::validation("date of birth is implausibly far in the past")
                    .with_field("date_of_birth"),
            )
            .set(move |c| c.date_of_birth = Some(date_of_birth))
            .record_with(move |c| {
                CustomerEvent::BirthDateChanged(BirthDateChanged {
                    customer_id: c.id,
                    date_of_birth,
                    occurred_at: Utc::now(),
                })
            })
            .apply()
    }

    /// `None` means "nothing to change" and applies as a successful no-op;
    /// so does setting the status the customer already has.
    pub fn change_status(&mut self, status: Option<CustomerStatus>) -> Outcome<()> {
        self.change()
            .when(|c| status.as_ref().is_some_and(|s| *s != c.status))
            .set({
                let status = status.clone();
                move |c| {
                    if let Some(status) = status {
                        c.status = status;
                    }
                }
            })
            .record_with(|c| {
                CustomerEvent::StatusChanged(StatusChanged {
                    customer_id: c.id,
                    status: c.status.clone(),
                    occurred_at: Utc::now(),
                })
            })
            .apply()
    }

    pub fn add_address(&mut self, address: Address) -> Outcome<()> {
        let address_id = address.id;
        self.change()
            .ensure(
                |_| rules::not_empty(&address.street),
                Error::validation("street must not be empty").with_field("street"),
            )
            .ensure(
                |_| rules::not_empty(&address.city),
                Error::validation("city must not be empty").with_field("city"),
            )
            .ensure(
                |_| rules::not_empty(&address.postal_code),
                Error::validation("postal code must not be empty").with_field("postal_code"),
            )
            .ensure(
                |c| c.addresses.len() < MAX_ADDRESSES,
                Error::validation(format!("no more than {MAX_ADDRESSES} addresses per customer"))
                    .with_field("addresses"),
            )
            .ensure(
                move |c| c.addresses.iter().all(|a| a.id != address_id),
                Error::conflict("address is already on file").with_field("addresses"),
            )
            .add(|c| &mut c.addresses, address)
            .record_with(move |c| {
                CustomerEvent::AddressAdded(AddressAdded {
                    customer_id: c.id,
                    address_id,
                    occurred_at: Utc::now(),
                })
            })
            .apply()
    }

    pub fn remove_address(&mut self, address_id: AddressId) -> Outcome<()> {
        self.change()
            .remove_by_id(
                |c| &mut c.addresses,
                |a| a.id,
                address_id,
                Error::not_found(format!("address {address_id} is not on file"))
                    .with_field("addresses"),
            )
            .record_with(move |c| {
                CustomerEvent::AddressRemoved(AddressRemoved {
                    customer_id: c.id,
                    address_id,
                    occurred_at: Utc::now(),
                })
            })
            .apply()
    }
}

impl AggregateRoot for Customer {
    type Id = CustomerId;
    type Event = CustomerEvent;

    fn id(&self) -> &CustomerId {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }

    fn bump_version(&mut self) {
        self.version += 1;
    }

    fn record(&mut self, event: CustomerEvent) {
        self.events.record(event);
    }

    fn pending_events(&self) -> &[CustomerEvent] {
        self.events.pending()
    }

    fn take_events(&mut self) -> Vec<CustomerEvent> {
        self.events.take()
    }
}

/// Event: Created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Created {
    pub customer_id: CustomerId,
    pub number: CustomerNumber,
    pub email: EmailAddress,
    pub occurred_at: DateTime<Utc>,
}

/// Event: NameChanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameChanged {
    pub customer_id: CustomerId,
    pub first_name: String,
    pub last_name: String,
    pub occurred_at: DateTime<Utc>,
}

/// Event: EmailChanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailChanged {
    pub customer_id: CustomerId,
    pub email: EmailAddress,
    pub occurred_at: DateTime<Utc>,
}

/// Event: BirthDateChanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BirthDateChanged {
    pub customer_id: CustomerId,
    pub date_of_birth: NaiveDate,
    pub occurred_at: DateTime<Utc>,
}

/// Event: StatusChanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusChanged {
    pub customer_id: CustomerId,
    pub status: CustomerStatus,
    pub occurred_at: DateTime<Utc>,
}

/// Event: AddressAdded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressAdded {
    pub customer_id: CustomerId,
    pub address_id: AddressId,
    pub occurred_at: DateTime<Utc>,
}

/// Event: AddressRemoved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressRemoved {
    pub customer_id: CustomerId,
    pub address_id: AddressId,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CustomerEvent {
    Created(Created),
    NameChanged(NameChanged),
    EmailChanged(EmailChanged),
    BirthDateChanged(BirthDateChanged),
    StatusChanged(StatusChanged),
    AddressAdded(AddressAdded),
    AddressRemoved(AddressRemoved),
}

impl Event for CustomerEvent {
    fn event_type(&self) -> &'static str {
        match self {
            CustomerEvent::Created(_) => "customers.customer.created",
            CustomerEvent::NameChanged(_) => "customers.customer.name_changed",
            CustomerEvent::EmailChanged(_) => "customers.customer.email_changed",
            CustomerEvent::BirthDateChanged(_) => "customers.customer.birth_date_changed",
            CustomerEvent::StatusChanged(_) => "customers.customer.status_changed",
            CustomerEvent::AddressAdded(_) => "customers.customer.address_added",
            CustomerEvent::AddressRemoved(_) => "customers.customer.address_removed",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            CustomerEvent::Created(e) => e.occurred_at,
            CustomerEvent::NameChanged(e) => e.occurred_at,
            CustomerEvent::EmailChanged(e) => e.occurred_at,
            CustomerEvent::BirthDateChanged(e) => e.occurred_at,
            CustomerEvent::StatusChanged(e) => e.occurred_at,
            CustomerEvent::AddressAdded(e) => e.occurred_at,
            CustomerEvent::AddressRemoved(e) => e.occurred_at,
        }
    }
}
