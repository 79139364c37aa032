//! The settable value contract and the adapters for scalar field kinds.
//!
//! Every adapter holds an exclusive reference into the caller's record. `set`
//! parses text and writes through that reference; `Display` renders the
//! current value back in a form `set` accepts.

use std::any::Any;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use chrono::TimeDelta;

use crate::duration::{format_nanos, parse_nanos};
use crate::error::FlagvarError;

/// Rendered by adapters that are not bound to a variable.
pub const ZERO: &str = "<zero>";

/// A variable that can be set from text and rendered back to text.
pub trait Value: fmt::Display {
    /// Parse `text` and store it in the bound variable. On error the variable
    /// keeps its previous value.
    fn set(&mut self, text: &str) -> Result<(), FlagvarError>;

    /// The current value at its declared type, for adapters that support
    /// typed introspection. Downcast with [`Any::downcast_ref`].
    fn get(&self) -> Option<&dyn Any> {
        None
    }

    /// Whether the flag may be given without a value, meaning `true`.
    fn is_bool_flag(&self) -> bool {
        false
    }
}

/// Scalar types handled by [`Scalar`].
pub trait ScalarType: FromStr<Err: fmt::Display> + fmt::Display + 'static {
    const NAME: &'static str;
    const IS_BOOL: bool = false;
}

macro_rules! scalar_types {
    ($($ty:ty),* $(,)?) => {
        $(
            impl ScalarType for $ty {
                const NAME: &'static str = stringify!($ty);
            }
        )*
    };
}

scalar_types!(
    i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64, String
);

impl ScalarType for bool {
    const NAME: &'static str = "bool";
    const IS_BOOL: bool = true;
}

/// Adapter for booleans, integers of every width, floats and strings.
///
/// Text is parsed with the type's `FromStr` (base 10 for integers) so
/// out-of-range input is rejected at the declared width. Floats render with
/// the shortest text that reads back to the same bits.
pub struct Scalar<'a, T: ScalarType> {
    slot: Option<&'a mut T>,
}

impl<'a, T: ScalarType> Scalar<'a, T> {
    pub fn new(slot: &'a mut T) -> Self {
        Self { slot: Some(slot) }
    }

    /// An adapter with no variable behind it. Renders as [`ZERO`].
    pub fn unbound() -> Self {
        Self { slot: None }
    }
}

impl<T: ScalarType> Value for Scalar<'_, T> {
    fn set(&mut self, text: &str) -> Result<(), FlagvarError> {
        let slot = self
            .slot
            .as_deref_mut()
            .ok_or(FlagvarError::Unbound { type_name: T::NAME })?;
        *slot = text
            .parse()
            .map_err(|e| FlagvarError::parse(text, T::NAME, e))?;
        Ok(())
    }

    fn get(&self) -> Option<&dyn Any> {
        self.slot.as_deref().map(|v| v as &dyn Any)
    }

    fn is_bool_flag(&self) -> bool {
        T::IS_BOOL
    }
}

impl<T: ScalarType> fmt::Display for Scalar<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.slot.as_deref() {
            Some(v) => write!(f, "{v}"),
            None => f.write_str(ZERO),
        }
    }
}

/// Adapter for a non-negative `std::time::Duration` in `1h2m3s` form.
pub struct DurationValue<'a> {
    slot: Option<&'a mut Duration>,
}

impl<'a> DurationValue<'a> {
    pub fn new(slot: &'a mut Duration) -> Self {
        Self { slot: Some(slot) }
    }

    pub fn unbound() -> Self {
        Self { slot: None }
    }
}

impl Value for DurationValue<'_> {
    fn set(&mut self, text: &str) -> Result<(), FlagvarError> {
        const NAME: &str = "Duration";
        let slot = self
            .slot
            .as_deref_mut()
            .ok_or(FlagvarError::Unbound { type_name: NAME })?;
        let nanos = parse_nanos(text).map_err(|e| FlagvarError::parse(text, NAME, e))?;
        let nanos = u128::try_from(nanos)
            .map_err(|_| FlagvarError::parse(text, NAME, "negative duration"))?;
        let secs = u64::try_from(nanos / 1_000_000_000)
            .map_err(|_| FlagvarError::parse(text, NAME, "duration out of range"))?;
        *slot = Duration::new(secs, (nanos % 1_000_000_000) as u32);
        Ok(())
    }

    fn get(&self) -> Option<&dyn Any> {
        self.slot.as_deref().map(|v| v as &dyn Any)
    }
}

impl fmt::Display for DurationValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.slot.as_deref() {
            Some(d) => f.write_str(&format_nanos(d.as_nanos() as i128)),
            None => f.write_str(ZERO),
        }
    }
}

/// Adapter for a signed `chrono::TimeDelta` in `-1h2m3s` form.
pub struct TimeDeltaValue<'a> {
    slot: Option<&'a mut TimeDelta>,
}

impl<'a> TimeDeltaValue<'a> {
    pub fn new(slot: &'a mut TimeDelta) -> Self {
        Self { slot: Some(slot) }
    }

    pub fn unbound() -> Self {
        Self { slot: None }
    }
}

impl Value for TimeDeltaValue<'_> {
    fn set(&mut self, text: &str) -> Result<(), FlagvarError> {
        const NAME: &str = "TimeDelta";
        let slot = self
            .slot
            .as_deref_mut()
            .ok_or(FlagvarError::Unbound { type_name: NAME })?;
        let nanos = parse_nanos(text).map_err(|e| FlagvarError::parse(text, NAME, e))?;
        let delta = i64::try_from(nanos.div_euclid(1_000_000_000))
            .ok()
            .and_then(|secs| TimeDelta::new(secs, nanos.rem_euclid(1_000_000_000) as u32))
            .ok_or_else(|| FlagvarError::parse(text, NAME, "duration out of range"))?;
        *slot = delta;
        Ok(())
    }

    fn get(&self) -> Option<&dyn Any> {
        self.slot.as_deref().map(|v| v as &dyn Any)
    }
}

impl fmt::Display for TimeDeltaValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.slot.as_deref() {
            Some(d) => {
                let nanos = d.num_seconds() as i128 * 1_000_000_000 + d.subsec_nanos() as i128;
                f.write_str(&format_nanos(nanos))
            }
            None => f.write_str(ZERO),
        }
    }
}
