//! `application/x-www-form-urlencoded` body decoding.

use std::collections::HashMap;

/// Decode a form-encoded body into single-valued fields.
///
/// `+` is a space, keys and values are percent-decoded, the first
/// occurrence of a repeated key wins and blank values are dropped.
pub fn decode_form_body(body: &[u8]) -> HashMap<String, String> {
    let mut result = HashMap::new();

    for pair in body.split(|&b| b == b'&') {
        if pair.is_empty() {
            continue;
        }

        let mut parts = pair.splitn(2, |&b| b == b'=');
        let key = decode_component(parts.next().unwrap_or_default());
        let value = decode_component(parts.next().unwrap_or_default());
        if value.is_empty() {
            continue;
        }

        result.entry(key).or_insert(value);
    }

    result
}

/// Encode fields as a form body, in the given order.
pub fn encode_form_body<'a, I>(fields: I) -> Vec<u8>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    fields
        .into_iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
        .into_bytes()
}

fn decode_component(raw: &[u8]) -> String {
    let spaced: Vec<u8> = raw
        .iter()
        .map(|&b| if b == b'+' { b' ' } else { b })
        .collect();
    let decoded = urlencoding::decode_binary(&spaced);
    String::from_utf8_lossy(&decoded).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn h(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[rstest]
    #[case("", &[])]
    #[case("instance_id=abc123", &[("instance_id", "abc123")])]
    #[case("instance_id=abc123&form_id=aXyZ", &[("instance_id", "abc123"), ("form_id", "aXyZ")])]
    #[case("instance_id=first&instance_id=second", &[("instance_id", "first")])]
    #[case("key=value%20with%20spaces", &[("key", "value with spaces")])]
    #[case("key=value+with+plus", &[("key", "value with plus")])]
    #[case("key%20name=value", &[("key name", "value")])]
    #[case("a=%26amp%3B&b=2", &[("a", "&amp;"), ("b", "2")])]
    #[case("a=1&&b=2&", &[("a", "1"), ("b", "2")])]
    #[case("blank=&b=2", &[("b", "2")])]
    #[case("novalue&b=2", &[("b", "2")])]
    #[case("blank=&blank=later", &[("blank", "later")])]
    fn test_decode_form_body(#[case] body: &str, #[case] expected: &[(&str, &str)]) {
        assert_eq!(decode_form_body(body.as_bytes()), h(expected));
    }

    #[rstest]
    fn test_decode_keeps_xml_intact() {
        let xml = "<data id=\"a\"><meta><instanceID>uuid:1</instanceID></meta></data>";
        let body = encode_form_body([("instance", xml), ("instance_id", "1")]);
        let fields = decode_form_body(&body);
        assert_eq!(fields.get("instance").map(String::as_str), Some(xml));
    }
}
