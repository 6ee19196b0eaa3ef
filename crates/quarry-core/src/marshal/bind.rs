//! Scalar and bulk parameter binding.

use std::os::raw::c_int;

use log::debug;

use super::{BindValue, ParamKey, ToBindValue};
use crate::{
    error::{QuarryError, Result},
    outcome::{translate, Outcome},
    statement::Statement,
};

/// Tag character prefixed to associative keys by
/// [`Statement::bind_from_associative`].
pub const DEFAULT_VARIABLE_TAG: char = ':';

impl Statement<'_> {
    /// Binds one value by position or by full parameter name.
    ///
    /// A numeric index goes to the engine as is, so an index out of range
    /// comes back as [`Outcome::Range`]. A name that does not resolve is a
    /// programming error and fails with [`QuarryError::UnknownParameter`].
    ///
    /// ```rust
    /// use quarry_core::{Connection, Outcome};
    ///
    /// # fn main() -> quarry_core::Result<()> {
    /// let conn = Connection::open_in_memory()?;
    /// let (mut stmt, _) = conn.prepare("SELECT :greeting, ?2")?;
    /// assert_eq!(stmt.bind(":greeting", "hello")?, Outcome::Ok);
    /// assert_eq!(stmt.bind(2usize, 42i64)?, Outcome::Ok);
    /// assert_eq!(stmt.bind(9usize, 1i64)?, Outcome::Range);
    /// # Ok(())
    /// # }
    /// ```
    pub fn bind(&mut self, key: impl Into<ParamKey>, value: impl ToBindValue) -> Result<Outcome> {
        let index = self.resolve_parameter(key.into())?;
        let value = value.to_bind_value()?;
        self.bind_value_at(index, &value)
    }

    /// Binds every `(key, value)` pair, naming the parameter `:key`.
    ///
    /// Fail-fast: the first unknown key raises
    /// [`QuarryError::UnknownParameter`] and the remaining pairs are not
    /// bound; pairs bound earlier in iteration order stay bound. The first
    /// non-ok engine outcome also stops the walk and is returned.
    pub fn bind_from_associative<I, K, V>(&mut self, pairs: I) -> Result<Outcome>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: ToBindValue,
    {
        self.bind_from_associative_with_tag(DEFAULT_VARIABLE_TAG, pairs)
    }

    /// [`Statement::bind_from_associative`] with a different tag character,
    /// for statements written with `@name` or `$name` parameters.
    pub fn bind_from_associative_with_tag<I, K, V>(&mut self, tag: char, pairs: I) -> Result<Outcome>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: ToBindValue,
    {
        let mut outcome = Outcome::Ok;
        for (key, value) in pairs {
            let name = format!("{tag}{}", key.as_ref());
            let index = self.resolve_parameter(ParamKey::Name(name))?;
            outcome = self.bind_value_at(index, &value.to_bind_value()?)?;
            if outcome != Outcome::Ok {
                return Ok(outcome);
            }
        }
        Ok(outcome)
    }

    /// Binds `values[i]` to position `i + 1`.
    pub fn bind_from_sequence<I, V>(&mut self, values: I) -> Result<Outcome>
    where
        I: IntoIterator<Item = V>,
        V: ToBindValue,
    {
        let mut outcome = Outcome::Ok;
        for (position, value) in values.into_iter().enumerate() {
            let index = self.resolve_parameter(ParamKey::Index(position + 1))?;
            outcome = self.bind_value_at(index, &value.to_bind_value()?)?;
            if outcome != Outcome::Ok {
                return Ok(outcome);
            }
        }
        Ok(outcome)
    }

    /// Binds a dynamic container: objects bind associatively, arrays
    /// positionally. Any other JSON value is not a container and fails with
    /// [`QuarryError::UnbindableType`].
    pub fn bind_json(&mut self, params: &serde_json::Value) -> Result<Outcome> {
        use serde_json::Value;

        match params {
            Value::Object(map) => self.bind_from_associative(map.iter()),
            Value::Array(values) => self.bind_from_sequence(values.iter()),
            Value::Null => Err(QuarryError::UnbindableType { type_name: "null" }),
            Value::Bool(_) => Err(QuarryError::UnbindableType { type_name: "boolean" }),
            Value::Number(_) => Err(QuarryError::UnbindableType { type_name: "number" }),
            Value::String(_) => Err(QuarryError::UnbindableType { type_name: "string" }),
        }
    }

    fn resolve_parameter(&self, key: ParamKey) -> Result<c_int> {
        let index = match key {
            ParamKey::Index(index) => index,
            ParamKey::Name(name) => match self.parameter_index(&name)? {
                0 => return Err(QuarryError::UnknownParameter { name }),
                index => index,
            },
        };
        c_int::try_from(index).map_err(|_| {
            QuarryError::invalid_input("index")
                .with_reason(format!("parameter index {index} does not fit the engine"))
        })
    }

    fn bind_value_at(&mut self, index: c_int, value: &BindValue) -> Result<Outcome> {
        let raw = self.raw("bind")?;
        debug!("binding parameter {index} as {}", value.type_name());
        let code = match value {
            BindValue::Null => raw.bind_null(index),
            BindValue::Boolean(flag) => raw.bind_int(index, c_int::from(*flag)),
            BindValue::Integer(number) => raw.bind_int64(index, *number),
            BindValue::Number(number) => raw.bind_double(index, *number),
            BindValue::Text(text) => raw.bind_text(index, text),
            BindValue::Blob(bytes) => raw.bind_blob(index, bytes),
        };
        Ok(translate(code))
    }
}
