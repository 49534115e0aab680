//! Rate and FX indices referenced by rate observations and FX resets.

use crate::core::currency::{CurrencyCode, CurrencyPair};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A term rate index such as `GBP-LIBOR-3M` or `EUR-EURIBOR-6M`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct IborIndex {
    name: String,
    currency: CurrencyCode,
}

impl IborIndex {
    pub fn new(name: impl Into<String>, currency: CurrencyCode) -> Self {
        Self {
            name: name.into(),
            currency,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn currency(&self) -> &CurrencyCode {
        &self.currency
    }
}

/// An overnight index such as `USD-FED-FUND` or `GBP-SONIA`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OvernightIndex {
    name: String,
    currency: CurrencyCode,
}

impl OvernightIndex {
    pub fn new(name: impl Into<String>, currency: CurrencyCode) -> Self {
        Self {
            name: name.into(),
            currency,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn currency(&self) -> &CurrencyCode {
        &self.currency
    }
}

/// An FX fixing index such as `ECB-EUR-USD`.
///
/// The fixing is the rate for [`FxIndex::pair`], quoted base/counter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FxIndex {
    name: String,
    pair: CurrencyPair,
}

impl FxIndex {
    pub fn new(name: impl Into<String>, pair: CurrencyPair) -> Self {
        Self {
            name: name.into(),
            pair,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn pair(&self) -> &CurrencyPair {
        &self.pair
    }
}

/// Any index that publishes a fixing series.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Index {
    Ibor(IborIndex),
    Overnight(OvernightIndex),
    Fx(FxIndex),
}

impl Index {
    pub fn name(&self) -> &str {
        match self {
            Index::Ibor(index) => index.name(),
            Index::Overnight(index) => index.name(),
            Index::Fx(index) => index.name(),
        }
    }
}

impl From<IborIndex> for Index {
    fn from(index: IborIndex) -> Self {
        Index::Ibor(index)
    }
}

impl From<OvernightIndex> for Index {
    fn from(index: OvernightIndex) -> Self {
        Index::Overnight(index)
    }
}

impl From<FxIndex> for Index {
    fn from(index: FxIndex) -> Self {
        Index::Fx(index)
    }
}

macro_rules! display_by_name {
    ($($ty:ty),*) => {
        $(impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.name())
            }
        })*
    };
}

display_by_name!(IborIndex, OvernightIndex, FxIndex, Index);
