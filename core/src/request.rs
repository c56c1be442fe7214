//! Query encoding and request signing.

use md5::{Digest, Md5};
use url::form_urlencoded;

use crate::types::{ParamValue, Params, ResponseFormat};

/// Turn a method identifier into the remote operation name.
///
/// `shelter_listByBreed` becomes `shelter.listByBreed`.
pub fn convert_method(method: &str) -> String {
    method.replace('_', ".")
}

/// Encode `params` as `application/x-www-form-urlencoded`, in order.
///
/// List values expand to indexed keys, so `breed: [a, b]` encodes as
/// `breed%5B0%5D=a&breed%5B1%5D=b`.
pub fn encode_query(params: &Params) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, value) in params.iter() {
        match value {
            ParamValue::Single(value) => {
                serializer.append_pair(key, value);
            }
            ParamValue::List(values) => {
                for (index, value) in values.iter().enumerate() {
                    serializer.append_pair(&format!("{key}[{index}]"), value);
                }
            }
        }
    }
    serializer.finish()
}

/// Signature expected by `auth.getToken`: hex MD5 over
/// `secret + "key=" + api_key + "&format=" + format`.
pub fn signature(api_secret: &str, api_key: &str, format: ResponseFormat) -> String {
    let mut hasher = Md5::new();
    hasher.update(api_secret.as_bytes());
    hasher.update(b"key=");
    hasher.update(api_key.as_bytes());
    hasher.update(b"&format=");
    hasher.update(format.as_str().as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn convert_method_replaces_every_separator() {
        assert_eq!(convert_method("shelter_listByBreed"), "shelter.listByBreed");
        assert_eq!(convert_method("pet_find"), "pet.find");
        assert_eq!(convert_method("a_b_c"), "a.b.c");
        assert_eq!(convert_method("already.dotted"), "already.dotted");
    }

    #[test]
    fn encode_query_preserves_insertion_order() {
        let params = Params::from([("key", "abc"), ("format", "xml"), ("location", "90210")]);
        assert_eq!(encode_query(&params), "key=abc&format=xml&location=90210");
    }

    #[test]
    fn encode_query_escapes_reserved_characters() {
        let params = Params::new().with("location", "San Francisco, CA");
        assert_eq!(encode_query(&params), "location=San+Francisco%2C+CA");
    }

    #[test]
    fn encode_query_leaves_asterisk_and_escapes_tilde_and_ampersand() {
        let params = Params::new().with("location", "a b~*").with("q", "a&b");
        assert_eq!(encode_query(&params), "location=a+b%7E*&q=a%26b");
    }

    #[test]
    fn encode_query_expands_lists_with_indices() {
        let params = Params::new().with("breed", vec!["Beagle", "Pug"]);
        assert_eq!(encode_query(&params), "breed%5B0%5D=Beagle&breed%5B1%5D=Pug");
    }

    #[test]
    fn encode_query_empty_params() {
        assert_eq!(encode_query(&Params::new()), "");
    }

    #[test]
    fn signature_hashes_secret_then_boilerplate() {
        // md5("shhkey=abc&format=xml")
        assert_eq!(
            signature("shh", "abc", ResponseFormat::Xml),
            "1d4c8bbc8725b39081b78a9206524e75"
        );
    }

    #[test]
    fn signature_depends_on_format() {
        assert_eq!(
            signature("shh", "abc", ResponseFormat::Json),
            "3d94d189b141b77f8ba0750c1bc5c3f3"
        );
    }

    #[test]
    fn signature_with_empty_secret_and_key() {
        assert_eq!(
            signature("", "", ResponseFormat::Json),
            "a8226311b7bc246e53f7b2d8dbe831a5"
        );
    }
}
