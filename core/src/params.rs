//! Form-body encoding in REDCap's parameter dialect.
//!
//! REDCap takes list parameters as indexed keys (`dags[0]=a`). Existing
//! deployments of this client emit consecutive entries with no separator
//! between them (`dags[0]=adags[1]=b`) and that byte layout is kept as is.
//! Values are percent-encoded; keys and the `[i]` suffix are written raw.

/// Which indexed-array key a list parameter is written under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Arms,
    Dags,
    Events,
    Records,
    Fields,
    Users,
    UserRoles,
    /// Bare `[i]=v` entries with no key prefix.
    Generic,
}

impl ListKind {
    pub fn prefix(self) -> &'static str {
        match self {
            ListKind::Arms => "arms",
            ListKind::Dags => "dags",
            ListKind::Events => "events",
            ListKind::Records => "records",
            ListKind::Fields => "fields",
            ListKind::Users => "users",
            ListKind::UserRoles => "roles",
            ListKind::Generic => "",
        }
    }
}

/// Percent-encode a single form value.
pub fn encode_value(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

/// Encode `values` as `prefix[0]=v0prefix[1]=v1...`, preserving order.
pub fn encode_indexed<S: AsRef<str>>(kind: ListKind, values: &[S]) -> String {
    let prefix = kind.prefix();
    values
        .iter()
        .enumerate()
        .map(|(i, value)| format!("{prefix}[{i}]={}", encode_value(value.as_ref())))
        .collect()
}

/// Ordered builder for an `application/x-www-form-urlencoded` body.
#[derive(Debug, Default, Clone)]
pub struct FormBody {
    buf: String,
}

impl FormBody {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `key=value`, encoding the value.
    pub fn pair(&mut self, key: &str, value: &str) -> &mut Self {
        self.separator();
        self.buf.push_str(key);
        self.buf.push('=');
        self.buf.push_str(&encode_value(value));
        self
    }

    /// Append an indexed list. An empty list appends nothing.
    pub fn indexed<S: AsRef<str>>(&mut self, kind: ListKind, values: &[S]) -> &mut Self {
        if values.is_empty() {
            return self;
        }
        self.separator();
        self.buf.push_str(&encode_indexed(kind, values));
        self
    }

    pub fn finish(self) -> String {
        self.buf
    }

    fn separator(&mut self) {
        if !self.buf.is_empty() {
            self.buf.push('&');
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dags_are_concatenated_without_separator() {
        assert_eq!(encode_indexed(ListKind::Dags, &["g1", "g2"]), "dags[0]=g1dags[1]=g2");
    }

    #[test]
    fn indices_follow_input_order() {
        let encoded = encode_indexed(ListKind::Events, &["c", "a", "b"]);
        assert_eq!(encoded, "events[0]=cevents[1]=aevents[2]=b");
    }

    #[test]
    fn each_kind_uses_its_prefix() {
        assert_eq!(encode_indexed(ListKind::Arms, &["1"]), "arms[0]=1");
        assert_eq!(encode_indexed(ListKind::Users, &["u"]), "users[0]=u");
        assert_eq!(encode_indexed(ListKind::UserRoles, &["r"]), "roles[0]=r");
        assert_eq!(encode_indexed(ListKind::Records, &["7"]), "records[0]=7");
        assert_eq!(encode_indexed(ListKind::Fields, &["age"]), "fields[0]=age");
        assert_eq!(encode_indexed(ListKind::Generic, &["x", "y"]), "[0]=x[1]=y");
    }

    #[test]
    fn empty_list_encodes_to_nothing() {
        let empty: [&str; 0] = [];
        assert_eq!(encode_indexed(ListKind::Dags, &empty), "");
    }

    #[test]
    fn entry_count_matches_input_length() {
        let values: Vec<String> = (0..25).map(|i| format!("v{i}")).collect();
        let encoded = encode_indexed(ListKind::Users, &values);
        assert_eq!(encoded.matches("users[").count(), 25);
        assert!(encoded.ends_with("users[24]=v24"));
    }

    #[test]
    fn values_are_percent_encoded() {
        assert_eq!(
            encode_indexed(ListKind::Dags, &["a&b=c", "é"]),
            "dags[0]=a%26b%3Dcdags[1]=%C3%A9"
        );
    }

    #[test]
    fn form_body_joins_pairs_with_ampersand() {
        let mut body = FormBody::new();
        body.pair("token", "T").pair("content", "dag").indexed(ListKind::Dags, &["a"]);
        assert_eq!(body.finish(), "token=T&content=dag&dags[0]=a");
    }

    #[test]
    fn form_body_skips_empty_lists() {
        let empty: [&str; 0] = [];
        let mut body = FormBody::new();
        body.pair("token", "T").indexed(ListKind::Arms, &empty).pair("content", "arm");
        assert_eq!(body.finish(), "token=T&content=arm");
    }

    #[test]
    fn form_body_encodes_spaces_in_values() {
        let mut body = FormBody::new();
        body.pair("beginTime", "2020-10-06 17:37");
        assert_eq!(body.finish(), "beginTime=2020-10-06%2017%3A37");
    }
}
