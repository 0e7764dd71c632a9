//! Decoding of `ipset list ... -o xml` output.

use serde::{Deserialize, Deserializer};

use super::{Entry, HashFamily, IpSet, SetType};

/// Root `<ipsets>` element
#[derive(Debug, Default, Deserialize)]
pub(super) struct Listing {
    #[serde(rename = "ipset", default)]
    pub sets: Vec<ListedSet>,
}

/// One `<ipset name="...">` element
#[derive(Debug, Deserialize)]
pub(super) struct ListedSet {
    #[serde(rename = "@name")]
    pub name: String,

    #[serde(rename = "type", default)]
    pub set_type: Option<SetType>,

    #[serde(default)]
    pub header: Option<Header>,

    #[serde(default)]
    pub members: Option<Members>,
}

#[derive(Debug, Deserialize)]
pub(super) struct Header {
    #[serde(default)]
    pub family: Option<HashFamily>,
    #[serde(default)]
    pub hashsize: Option<i64>,
    #[serde(default)]
    pub maxelem: Option<i64>,
    #[serde(default)]
    pub comment: Option<Flag>,
}

/// Presence-only element such as `<comment/>`
#[derive(Debug, Deserialize)]
pub(super) struct Flag {}

#[derive(Debug, Default, Deserialize)]
pub(super) struct Members {
    #[serde(rename = "member", default)]
    pub members: Vec<Member>,
}

#[derive(Debug, Deserialize)]
pub(super) struct Member {
    #[serde(rename = "elem")]
    pub element: String,
    #[serde(default, deserialize_with = "deserialize_comment")]
    pub comment: Option<String>,
}

impl From<Member> for Entry {
    fn from(member: Member) -> Self {
        Entry {
            element: member.element,
            comment: member.comment,
        }
    }
}

impl Listing {
    pub fn parse(output: &str) -> Result<Self, quick_xml::DeError> {
        let output = output.trim();
        if output.is_empty() {
            return Ok(Listing::default());
        }
        quick_xml::de::from_str(output)
    }

    /// Set names in document order
    pub fn names(self) -> Vec<String> { self.sets.into_iter().map(|set| set.name).collect() }

    /// Members of the first set called `name` that has any
    pub fn entries(self, name: &str) -> Vec<Entry> {
        self.sets
            .into_iter()
            .filter(|set| set.name == name)
            .filter_map(|set| set.members)
            .find(|members| !members.members.is_empty())
            .map(|members| members.members.into_iter().map(Entry::from).collect())
            .unwrap_or_default()
    }

    /// Specification of the set called `name`, rebuilt from its header
    pub fn describe(self, name: &str) -> Option<IpSet> {
        self.sets
            .into_iter()
            .find(|set| set.name == name)
            .map(ListedSet::into_spec)
    }
}

impl ListedSet {
    fn into_spec(self) -> IpSet {
        let mut builder = IpSet::builder().name(&self.name);
        if let Some(set_type) = self.set_type {
            builder = builder.set_type(set_type);
        }
        if let Some(header) = self.header {
            if let Some(family) = header.family {
                builder = builder.hash_family(family);
            }
            if let Some(size) = header.hashsize {
                builder = builder.hash_size(size);
            }
            if let Some(max) = header.maxelem {
                builder = builder.max_element(max);
            }
            if header.comment.is_some() {
                builder = builder.with_comment();
            }
        }
        builder.build()
    }
}

/// ipset prints comments wrapped in double quotes; strip one pair
fn deserialize_comment<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let comment = Option::<String>::deserialize(deserializer)?;
    Ok(comment
        .map(|c| {
            let c = c.trim();
            c.strip_prefix('"')
                .and_then(|c| c.strip_suffix('"'))
                .unwrap_or(c)
                .to_string()
        })
        .filter(|c| !c.is_empty()))
}
