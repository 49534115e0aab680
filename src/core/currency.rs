use crate::pricer::environment::{PricingEnvironment, UnsupportedQueryError};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

/// ISO 4217-style currency code.
///
/// # Examples
///
/// ```
/// use swap_leg_engine::core::currency::CurrencyCode;
///
/// let usd = CurrencyCode::new("USD");
/// let gbp = CurrencyCode::new("GBP");
/// assert_ne!(usd, gbp);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CurrencyCode(String);

impl CurrencyCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for CurrencyCode {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Errors arising from FX rate operations.
#[derive(Debug, Error)]
pub enum FxError {
    #[error("no FX rate available for {base}/{counter}")]
    RateNotFound {
        base: CurrencyCode,
        counter: CurrencyCode,
    },
    #[error("FX rate must be positive, got {rate} for {base}/{counter}")]
    InvalidRate {
        base: CurrencyCode,
        counter: CurrencyCode,
        rate: f64,
    },
}

/// An ordered pair of currencies, quoted as `base/counter`.
///
/// A rate of `r` on the pair means one unit of `base` buys `r` units of `counter`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CurrencyPair {
    pub base: CurrencyCode,
    pub counter: CurrencyCode,
}

impl CurrencyPair {
    pub fn new(base: CurrencyCode, counter: CurrencyCode) -> Self {
        Self { base, counter }
    }

    /// Whether `currency` is one of the two legs of the pair.
    pub fn contains(&self, currency: &CurrencyCode) -> bool {
        &self.base == currency || &self.counter == currency
    }

    /// The other currency of the pair, or `None` if `currency` is not in the pair.
    pub fn other(&self, currency: &CurrencyCode) -> Option<&CurrencyCode> {
        if &self.base == currency {
            Some(&self.counter)
        } else if &self.counter == currency {
            Some(&self.base)
        } else {
            None
        }
    }

    pub fn inverse(&self) -> Self {
        Self::new(self.counter.clone(), self.base.clone())
    }
}

impl fmt::Display for CurrencyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.base, self.counter)
    }
}

/// An amount of money in a single currency.
///
/// The sign carries direction: positive amounts are received, negative amounts are paid.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CurrencyAmount {
    pub currency: CurrencyCode,
    pub amount: Decimal,
}

impl CurrencyAmount {
    pub fn new(currency: CurrencyCode, amount: Decimal) -> Self {
        Self { currency, amount }
    }

    pub fn zero(currency: CurrencyCode) -> Self {
        Self::new(currency, Decimal::ZERO)
    }

    pub fn negated(&self) -> Self {
        Self::new(self.currency.clone(), -self.amount)
    }

    /// Convert into `target` using the environment's FX rate for `self.currency/target`.
    pub fn convert_to<E>(
        &self,
        target: &CurrencyCode,
        env: &E,
    ) -> Result<CurrencyAmount, UnsupportedQueryError>
    where
        E: PricingEnvironment + ?Sized,
    {
        if &self.currency == target {
            return Ok(self.clone());
        }
        let rate = env.fx_rate(&self.currency, target)?;
        let rate = Decimal::try_from(rate).map_err(|e| {
            UnsupportedQueryError::new("fx_rate", format!("rate {rate} is not representable: {e}"))
        })?;
        let amount = self.amount.checked_mul(rate).ok_or_else(|| {
            UnsupportedQueryError::new("fx_rate", format!("{self} at {rate} overflows"))
        })?;
        Ok(CurrencyAmount::new(target.clone(), amount))
    }
}

impl fmt::Display for CurrencyAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.currency, self.amount)
    }
}

/// FX quote table.
///
/// Stores direct quotes and derives the inverse on insertion. Rates are market
/// data, so they are held as `f64` like every other quantity a pricing
/// environment serves.
///
/// # Examples
///
/// ```
/// use swap_leg_engine::core::currency::{CurrencyCode, FxRateTable};
///
/// let mut rates = FxRateTable::new();
/// rates.set_rate(CurrencyCode::new("GBP"), CurrencyCode::new("USD"), 1.25).unwrap();
///
/// let inverse = rates.get_rate(&CurrencyCode::new("USD"), &CurrencyCode::new("GBP")).unwrap();
/// assert!((inverse - 0.8).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FxRateTable {
    #[serde(with = "rates_serde")]
    rates: HashMap<(CurrencyCode, CurrencyCode), f64>,
}

mod rates_serde {
    use super::*;
    use serde::de::{self, MapAccess, Visitor};
    use serde::ser::SerializeMap;

    pub fn serialize<S: serde::Serializer>(
        rates: &HashMap<(CurrencyCode, CurrencyCode), f64>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(rates.len()))?;
        for ((base, counter), rate) in rates {
            map.serialize_entry(&format!("{}/{}", base, counter), rate)?;
        }
        map.end()
    }

    pub fn deserialize<'de, D: serde::Deserializer<'de>>(
        deserializer: D,
    ) -> Result<HashMap<(CurrencyCode, CurrencyCode), f64>, D::Error> {
        struct V;
        impl<'de> Visitor<'de> for V {
            type Value = HashMap<(CurrencyCode, CurrencyCode), f64>;
            fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                f.write_str("a map with \"BASE/COUNTER\" keys")
            }
            fn visit_map<M: MapAccess<'de>>(self, mut access: M) -> Result<Self::Value, M::Error> {
                // every quote goes through set_rate so it is checked and gets its inverse
                let mut table = FxRateTable::new();
                while let Some((key, value)) = access.next_entry::<String, f64>()? {
                    let (base, counter) = key
                        .split_once('/')
                        .ok_or_else(|| de::Error::custom(format!("invalid pair: {key}")))?;
                    table
                        .set_rate(CurrencyCode::new(base), CurrencyCode::new(counter), value)
                        .map_err(de::Error::custom)?;
                }
                Ok(table.rates)
            }
        }
        deserializer.deserialize_map(V)
    }
}

impl FxRateTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a direct quote: 1 unit of `base` = `rate` units of `counter`.
    pub fn set_rate(
        &mut self,
        base: CurrencyCode,
        counter: CurrencyCode,
        rate: f64,
    ) -> Result<(), FxError> {
        if !(rate > 0.0 && rate.is_finite()) {
            return Err(FxError::InvalidRate {
                base,
                counter,
                rate,
            });
        }
        self.rates.insert((base.clone(), counter.clone()), rate);
        self.rates.insert((counter, base), 1.0 / rate);
        Ok(())
    }

    /// Get the rate for `base/counter`. Equal currencies always quote 1.
    pub fn get_rate(&self, base: &CurrencyCode, counter: &CurrencyCode) -> Result<f64, FxError> {
        if base == counter {
            return Ok(1.0);
        }
        self.rates
            .get(&(base.clone(), counter.clone()))
            .copied()
            .ok_or_else(|| FxError::RateNotFound {
                base: base.clone(),
                counter: counter.clone(),
            })
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}
