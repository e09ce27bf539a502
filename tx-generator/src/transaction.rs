use chrono::{DateTime, Utc};
use rand::distributions::{Distribution, Standard};
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::{Builder, Uuid};

/// Amounts are whole cents; negative values are debits, positive values credits.
pub const MIN_AMOUNT: i64 = -10_000;
pub const MAX_AMOUNT: i64 = 10_000;
pub const MIN_ACCOUNT: u32 = 1;
pub const MAX_ACCOUNT: u32 = 1_000;
pub const ACCOUNT_PREFIX: &str = "acc_";

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum Asset {
    Usd,
    Eur,
    Btc,
    Eth,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum Status {
    Pending,
    Completed,
    Failed,
}

impl Asset {
    pub const ALL: [Asset; 4] = [Asset::Usd, Asset::Eur, Asset::Btc, Asset::Eth];
}

impl Status {
    pub const ALL: [Status; 3] = [Status::Pending, Status::Completed, Status::Failed];
}

/// A synthetic transaction, emitted once and never retained.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Transaction {
    pub id: Uuid,
    pub account_id: String,
    pub amount: i64,
    pub asset: Asset,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    pub status: Status,
}

/// `created_at` travels as RFC 3339 with an explicit `+00:00` offset.
mod timestamp {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub(super) fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Micros, false))
    }

    pub(super) fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|parsed| parsed.with_timezone(&Utc))
            .map_err(de::Error::custom)
    }
}

impl Distribution<Asset> for Standard {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Asset {
        Asset::ALL[rng.gen_range(0..Asset::ALL.len())]
    }
}

impl Distribution<Status> for Standard {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Status {
        Status::ALL[rng.gen_range(0..Status::ALL.len())]
    }
}

impl Distribution<Transaction> for Standard {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Transaction {
        Transaction::random_at(rng, Utc::now())
    }
}

impl Transaction {
    /// Draws every field except `created_at` from `rng`, including the UUID bytes,
    /// so a seeded generator reproduces the same records.
    #[must_use]
    pub fn random_at<R: Rng + ?Sized>(rng: &mut R, created_at: DateTime<Utc>) -> Self {
        let id = Builder::from_random_bytes(rng.gen()).into_uuid();
        Transaction {
            id,
            account_id: format!(
                "{}{}",
                ACCOUNT_PREFIX,
                rng.gen_range(MIN_ACCOUNT..=MAX_ACCOUNT)
            ),
            amount: rng.gen_range(MIN_AMOUNT..=MAX_AMOUNT),
            asset: Standard.sample(rng),
            created_at,
            status: Standard.sample(rng),
        }
    }

    /// # Errors
    /// Errors if serialization fails, which the field types here never trigger
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// # Errors
    /// Errors when `bytes` is not a JSON object carrying exactly the six transaction fields
    pub fn from_json(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }
}

/// Builds one fully populated record, stamped with the current UTC time.
#[must_use]
pub fn generate_transaction<R: Rng + ?Sized>(rng: &mut R) -> Transaction {
    Standard.sample(rng)
}
