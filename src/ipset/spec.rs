use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::Deserialize;

use super::{HashFamily, SetType, ValidationError};

/// Declarative description of a set, as passed to `ipset create`
///
/// Build one with [`IpSet::builder`] or [`IpSet::new`]; unset fields keep the
/// defaults ipset itself uses for `hash:ip`. The same structure is the `[set]`
/// section of the configuration file.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct IpSet {
    /// Name of the set, unique among the kernel's sets
    #[serde(default)]
    pub name: String,

    /// Set type, default is `hash:ip`
    #[serde(default)]
    pub set_type: SetType,

    /// Protocol family, default is `inet`
    #[serde(default)]
    pub hash_family: HashFamily,

    /// Initial hash size, default is 1024
    #[serde(default = "IpSet::default_hash_size")]
    pub hash_size: i64,

    /// Maximum number of elements the set can hold, default is 65536
    #[serde(default = "IpSet::default_max_element")]
    pub max_element: i64,

    /// Enable per-entry comments, default is false
    #[serde(default)]
    pub comment: bool,
}

impl IpSet {
    #[inline]
    fn default_hash_size() -> i64 { 1024 }

    #[inline]
    fn default_max_element() -> i64 { 65536 }

    pub fn builder() -> IpSetBuilder { IpSetBuilder::default() }

    /// A set with the given name and every other field defaulted
    pub fn new(name: &str) -> Self { Self::builder().name(name).build() }

    /// Check the specification before it is handed to ipset
    ///
    /// The family is only checked for types that take one.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.set_type == SetType::HashIp && !self.hash_family.is_supported() {
            return Err(ValidationError::InvalidHashFamily(
                self.hash_family.to_string(),
            ));
        }

        if !self.set_type.is_supported() {
            return Err(ValidationError::InvalidSetType(self.set_type.to_string()));
        }

        if self.hash_size <= 0 {
            return Err(ValidationError::InvalidHashSize(self.hash_size));
        }

        if self.max_element <= 0 {
            return Err(ValidationError::InvalidMaxElement(self.max_element));
        }

        Ok(())
    }

    /// Arguments following `create <name>`
    pub(super) fn create_args(&self) -> Vec<String> {
        let mut args = vec![self.set_type.to_string()];

        if self.set_type == SetType::HashIp {
            args.extend([
                "family".to_string(),
                self.hash_family.to_string(),
                "hashsize".to_string(),
                self.hash_size.to_string(),
                "maxelem".to_string(),
                self.max_element.to_string(),
            ]);
        }

        if self.comment {
            args.push("comment".to_string());
        }

        args
    }
}

impl Default for IpSet {
    fn default() -> Self {
        IpSet {
            name: String::new(),
            set_type: SetType::default(),
            hash_family: HashFamily::default(),
            hash_size: IpSet::default_hash_size(),
            max_element: IpSet::default_max_element(),
            comment: false,
        }
    }
}

impl Display for IpSet {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        write!(
            f,
            "{} {} family {} hashsize {} maxelem {}",
            self.name, self.set_type, self.hash_family, self.hash_size, self.max_element
        )?;
        if self.comment {
            f.write_str(" comment")?;
        }
        Ok(())
    }
}

/// Applies options over the default [`IpSet`]
#[derive(Default)]
pub struct IpSetBuilder {
    set: IpSet,
}

impl IpSetBuilder {
    pub fn name(mut self, name: &str) -> Self {
        self.set.name = name.to_string();
        self
    }
    pub fn set_type(mut self, set_type: SetType) -> Self {
        self.set.set_type = set_type;
        self
    }
    pub fn hash_family(mut self, family: HashFamily) -> Self {
        self.set.hash_family = family;
        self
    }
    pub fn hash_size(mut self, size: i64) -> Self {
        self.set.hash_size = size;
        self
    }
    pub fn max_element(mut self, max: i64) -> Self {
        self.set.max_element = max;
        self
    }
    pub fn with_comment(mut self) -> Self {
        self.set.comment = true;
        self
    }
    pub fn build(self) -> IpSet { self.set }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_specification() {
        let set = IpSet::new("foo");
        assert_eq!(set.validate(), Ok(()));
        assert_eq!(set.name, "foo");
        assert_eq!(set.set_type, SetType::HashIp);
        assert_eq!(set.hash_family, HashFamily::Inet);
        assert_eq!(set.hash_size, 1024);
        assert_eq!(set.max_element, 65536);
        assert!(!set.comment);
    }

    #[test]
    fn test_validate() {
        let cases = [
            (
                "type, hashsize, max elements",
                IpSet::builder()
                    .name("foo")
                    .set_type(SetType::HashIp)
                    .hash_size(256)
                    .max_element(128)
                    .build(),
                Ok(()),
            ),
            (
                "ipv6 family",
                IpSet::builder()
                    .name("foo")
                    .hash_family(HashFamily::Inet6)
                    .build(),
                Ok(()),
            ),
            (
                "invalid type",
                IpSet::builder()
                    .name("foo")
                    .set_type(SetType::Unsupported("invalid".into()))
                    .build(),
                Err(ValidationError::InvalidSetType("invalid".into())),
            ),
            (
                "invalid family",
                IpSet::builder()
                    .name("foo")
                    .hash_family(HashFamily::Unsupported("ipx".into()))
                    .build(),
                Err(ValidationError::InvalidHashFamily("ipx".into())),
            ),
            (
                "invalid hash size",
                IpSet::builder().name("foo").hash_size(-1).build(),
                Err(ValidationError::InvalidHashSize(-1)),
            ),
            (
                "invalid max elements",
                IpSet::builder()
                    .name("foo")
                    .hash_size(1024)
                    .max_element(0)
                    .build(),
                Err(ValidationError::InvalidMaxElement(0)),
            ),
        ];

        for (name, set, expected) in cases {
            assert_eq!(set.validate(), expected, "[{name}]");
        }
    }

    #[test]
    fn test_validation_messages() {
        let err = IpSet::builder().hash_size(-1).build().validate().unwrap_err();
        assert_eq!(err.to_string(), "invalid Hash Size value -1, should be >0");

        let err = IpSet::builder().max_element(0).build().validate().unwrap_err();
        assert_eq!(err.to_string(), "invalid Max Element value 0, should be >0");
    }

    #[test]
    fn test_family_ignored_for_unsupported_type() {
        let set = IpSet::builder()
            .set_type(SetType::Unsupported("list:set".into()))
            .hash_family(HashFamily::Unsupported("ipx".into()))
            .build();
        assert_eq!(
            set.validate(),
            Err(ValidationError::InvalidSetType("list:set".into()))
        );
    }

    #[test]
    fn test_create_args() {
        let set = IpSet::builder()
            .name("foo")
            .hash_size(256)
            .max_element(128)
            .with_comment()
            .build();
        assert_eq!(
            set.create_args(),
            [
                "hash:ip", "family", "inet", "hashsize", "256", "maxelem", "128", "comment"
            ]
        );
    }

    #[test]
    fn test_deserialize_defaults() {
        let set: IpSet = toml::from_str(
            r#"
            name = "blocked"
            hash_family = "inet6"
            comment = true
            "#,
        )
        .unwrap();
        assert_eq!(
            set,
            IpSet::builder()
                .name("blocked")
                .hash_family(HashFamily::Inet6)
                .with_comment()
                .build()
        );
    }
}
