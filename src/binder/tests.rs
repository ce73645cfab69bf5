//! Tests for binding and response binding.

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use serde::{Deserialize, Serialize};

    use crate::binder::{
        bind, bind_bag, encode_query, merged_query, push_url, response_bind, response_bind_with, QueryBag,
        ResponseOptions, SeedSource, PUSH_URL_HEADER,
    };
    use crate::coerce::ScalarKind;
    use crate::context::{Exchange, HttpContext};
    use crate::error::Error;

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    #[derive(Debug, Default, PartialEq, Deserialize, Serialize)]
    struct TestStruct {
        #[serde(rename = "str")]
        string_value: String,
        #[serde(rename = "int")]
        int_value: i32,
        #[serde(rename = "bool")]
        bool_value: bool,
        #[serde(rename = "float")]
        float_value: f64,
        #[serde(rename = "slice")]
        slice_value: Vec<i32>,
    }

    fn request(target: &str) -> Exchange {
        Exchange::new("GET", target).with_header("Host", "example.com")
    }

    #[test]
    fn test_query_bag_parse() {
        let bag = QueryBag::parse("a=1&b=hello+world&c=%2Fpath&a=2&flag").unwrap();
        assert_eq!(bag.get("a"), Some("1"));
        assert_eq!(bag.get_all("a"), ["1".to_string(), "2".to_string()]);
        assert_eq!(bag.get("b"), Some("hello world"));
        assert_eq!(bag.get("c"), Some("/path"));
        assert_eq!(bag.get("flag"), Some(""));
        assert_eq!(bag.get("missing"), None);
        assert_eq!(bag.len(), 4);
    }

    #[test]
    fn test_query_bag_keeps_commas() {
        let bag = QueryBag::parse("ids=1,2,3&tags=x%2Cy").unwrap();
        assert_eq!(bag.get("ids"), Some("1,2,3"));
        assert_eq!(bag.get("tags"), Some("x,y"));
    }

    #[test]
    fn test_query_bag_invalid_escape() {
        assert!(matches!(QueryBag::parse("invalid%zz"), Err(Error::MalformedUrl(_))));
        assert!(matches!(QueryBag::parse("a=%2"), Err(Error::MalformedUrl(_))));
        assert!(matches!(QueryBag::parse("a=100%"), Err(Error::MalformedUrl(_))));
    }

    #[test]
    fn test_query_bag_from_url() {
        let bag = QueryBag::from_url("https://example.com/list?page=3&sort=asc#top").unwrap();
        assert_eq!(bag.get("page"), Some("3"));
        assert_eq!(bag.get("sort"), Some("asc"));

        assert!(QueryBag::from_url("https://example.com/list").unwrap().is_empty());
        assert!(QueryBag::from_url("/?").unwrap().is_empty());
    }

    #[test]
    fn test_query_bag_overlay_replaces_values() {
        let mut seeded = QueryBag::parse("x=1&x=3&y=keep").unwrap();
        let live = QueryBag::parse("x=2&z=new").unwrap();
        seeded.overlay(&live);

        assert_eq!(seeded.get_all("x"), ["2".to_string()]);
        assert_eq!(seeded.get("y"), Some("keep"));
        assert_eq!(seeded.get("z"), Some("new"));
        let keys: Vec<&str> = seeded.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["x", "y", "z"]);
    }

    #[test]
    fn test_query_bag_set_and_remove() {
        let mut bag = QueryBag::new();
        bag.append("a", "1");
        bag.append("a", "2");
        bag.set("a", "3");
        assert_eq!(bag.get_all("a"), ["3".to_string()]);
        assert_eq!(bag.remove("a"), Some(vec!["3".to_string()]));
        assert!(!bag.contains_key("a"));
        assert_eq!(bag.remove("a"), None);
    }

    #[test]
    fn test_bind_success() {
        init_logger();
        let exchange = request("/?str=hello&int=42&bool=true&float=3.14&slice=1,2,3");

        let result: TestStruct = bind(&exchange).unwrap();
        assert_eq!(result.string_value, "hello");
        assert_eq!(result.int_value, 42);
        assert!(result.bool_value);
        assert_eq!(result.float_value, 3.14);
        assert_eq!(result.slice_value, vec![1, 2, 3]);
    }

    #[test]
    fn test_bind_encoded_list_separator() {
        let exchange = request("/?slice=1%2C2%2C3");
        let result: TestStruct = bind(&exchange).unwrap();
        assert_eq!(result.slice_value, vec![1, 2, 3]);
    }

    #[test]
    fn test_bind_missing_query_params() {
        let exchange = request("/");
        let result: TestStruct = bind(&exchange).unwrap();
        assert_eq!(result, TestStruct::default());
    }

    #[test]
    fn test_bind_empty_query_params() {
        let exchange = request("/?");
        let result: TestStruct = bind(&exchange).unwrap();
        assert_eq!(result, TestStruct::default());
        assert!(result.slice_value.is_empty());
    }

    #[test]
    fn test_bind_empty_values_are_skipped() {
        let exchange = request("/?str=&int=&slice=");
        let result: TestStruct = bind(&exchange).unwrap();
        assert_eq!(result, TestStruct::default());
    }

    #[test]
    fn test_bind_invalid_number() {
        let exchange = request("/?int=not_a_number");
        let result: Result<TestStruct, Error> = bind(&exchange);
        assert!(matches!(result, Err(Error::InvalidNumber { kind: ScalarKind::I32, ref value }) if value == "not_a_number"));
    }

    #[test]
    fn test_bind_invalid_query_values() {
        init_logger();
        let exchange = request("/?str=hello&int=invalid_int&bool=invalid_bool&float=invalid_float&slice=1,invalid_int,3");
        let result: Result<TestStruct, Error> = bind(&exchange);
        // Fields are walked in declaration order, so `int` fails first
        assert!(matches!(result, Err(Error::InvalidNumber { kind: ScalarKind::I32, .. })));
    }

    #[test]
    fn test_bind_invalid_boolean() {
        let exchange = request("/?bool=yes");
        let result: Result<TestStruct, Error> = bind(&exchange);
        assert!(matches!(result, Err(Error::InvalidBoolean(ref v)) if v == "yes"));
    }

    #[test]
    fn test_bind_unsupported_types() {
        #[derive(Debug, Deserialize)]
        struct UnsupportedStruct {
            #[allow(dead_code)]
            unsupported: HashMap<String, String>,
        }

        let exchange = request("/?unsupported=key:value");
        let result: Result<UnsupportedStruct, Error> = bind(&exchange);
        assert!(matches!(result, Err(Error::UnsupportedKind("map"))));
    }

    #[test]
    fn test_bind_invalid_query_syntax() {
        let exchange = request("/?invalid%zz");
        let result: Result<TestStruct, Error> = bind(&exchange);
        assert!(matches!(result, Err(Error::MalformedUrl(_))));
    }

    #[test]
    fn test_bind_untagged_field_is_untouched() {
        #[derive(Debug, Deserialize)]
        struct Partial {
            page: u32,
            #[serde(skip)]
            internal: Vec<String>,
        }

        let exchange = request("/?page=4&internal=a,b");
        let result: Partial = bind(&exchange).unwrap();
        assert_eq!(result.page, 4);
        assert!(result.internal.is_empty());
    }

    #[test]
    fn test_bind_seeds_from_referer() {
        let exchange = request("/fragment").with_header("Referer", "http://example.com/list?str=from_page&int=7");
        let result: TestStruct = bind(&exchange).unwrap();
        assert_eq!(result.string_value, "from_page");
        assert_eq!(result.int_value, 7);
    }

    #[test]
    fn test_bind_live_params_override_referer() {
        let exchange = request("/fragment?x=2").with_header("Referer", "http://example.com/list?x=1&y=3");

        let bag = merged_query(&exchange).unwrap();
        assert_eq!(bag.get("x"), Some("2"));
        assert_eq!(bag.get("y"), Some("3"));

        #[derive(Deserialize)]
        struct Xy {
            x: u8,
            y: u8,
        }
        let result: Xy = bind(&exchange).unwrap();
        assert_eq!((result.x, result.y), (2, 3));
    }

    #[test]
    fn test_bind_malformed_referer() {
        let exchange = request("/fragment?int=1").with_header("Referer", "http://example.com/?bad=%g1");
        let result: Result<TestStruct, Error> = bind(&exchange);
        assert!(matches!(result, Err(Error::MalformedUrl(_))));
    }

    #[test]
    fn test_bind_empty_referer_falls_back_to_request_url() {
        let exchange = request("/?int=5").with_header("Referer", "");
        let result: TestStruct = bind(&exchange).unwrap();
        assert_eq!(result.int_value, 5);
    }

    #[test]
    fn test_seed_order() {
        assert_eq!(SeedSource::ORDER, [SeedSource::Referer, SeedSource::OriginalUrl]);
    }

    #[test]
    fn test_bind_bag() {
        let mut bag = QueryBag::new();
        bag.append("str", "direct");
        bag.append("slice", "9");
        let result: TestStruct = bind_bag(&bag).unwrap();
        assert_eq!(result.string_value, "direct");
        assert_eq!(result.slice_value, vec![9]);
    }

    #[test]
    fn test_encode_query() {
        let pairs = vec![
            ("q".to_string(), "a b&c".to_string()),
            ("tags".to_string(), "x,y".to_string()),
            ("path".to_string(), "/a/b".to_string()),
        ];
        assert_eq!(encode_query(&pairs), "q=a+b%26c&tags=x,y&path=%2Fa%2Fb");
        assert_eq!(encode_query(&[]), "");
    }

    #[test]
    fn test_push_url() {
        let value = TestStruct {
            string_value: "hi there".to_string(),
            int_value: 0,
            bool_value: false,
            float_value: 2.5,
            slice_value: vec![1, 2],
        };
        let url = push_url("http://h", "/p", &value).unwrap();
        assert_eq!(url, "http://h/p?str=hi+there&int=0&bool=false&float=2.5&slice=1,2");

        assert_eq!(push_url("http://h", "/p", &7u8), None);
    }

    #[test]
    fn test_response_bind_with_path_override() {
        init_logger();

        #[derive(Serialize)]
        struct Ab {
            a: u32,
            b: Vec<String>,
        }

        let mut exchange = request("/current?ignored=1");
        let value = Ab {
            a: 1,
            b: vec!["x".to_string(), "y".to_string()],
        };
        response_bind_with(&mut exchange, &value, &ResponseOptions::new().with_path("/foo"));

        assert_eq!(exchange.response_header(PUSH_URL_HEADER), Some("http://example.com/foo?a=1&b=x,y"));
    }

    #[test]
    fn test_response_bind_uses_request_path() {
        let mut exchange = request("/items?page=1");
        let value = TestStruct {
            string_value: "hello".to_string(),
            ..TestStruct::default()
        };
        response_bind(&mut exchange, &value);

        assert_eq!(
            exchange.response_header("hx-push-url"),
            Some("http://example.com/items?str=hello&int=0&bool=false&float=0")
        );
    }

    #[test]
    fn test_response_bind_custom_header() {
        let mut exchange = request("/");
        let value = TestStruct::default();
        response_bind_with(&mut exchange, &value, &ResponseOptions::new().with_header("HX-Replace-Url"));

        assert_eq!(exchange.response_header(PUSH_URL_HEADER), None);
        assert!(exchange.response_header("HX-Replace-Url").is_some());
    }

    #[test]
    fn test_response_bind_omits_unsupported_field() {
        init_logger();

        #[derive(Serialize)]
        struct WithMap {
            first: i8,
            meta: HashMap<String, String>,
            last: bool,
        }

        let mut meta = HashMap::new();
        meta.insert("k".to_string(), "v".to_string());
        let value = WithMap {
            first: -1,
            meta,
            last: true,
        };

        let mut exchange = request("/m");
        response_bind(&mut exchange, &value);
        assert_eq!(exchange.response_header(PUSH_URL_HEADER), Some("http://example.com/m?first=-1&last=true"));
    }

    #[test]
    fn test_response_bind_non_struct_leaves_header_unset() {
        let mut exchange = request("/");
        response_bind(&mut exchange, &vec![1, 2, 3]);
        assert_eq!(exchange.response_header(PUSH_URL_HEADER), None);
    }

    #[test]
    fn test_response_bind_replaces_previous_header() {
        let mut exchange = request("/");
        exchange.set_response_header(PUSH_URL_HEADER, "stale".to_string());

        let value = TestStruct {
            int_value: 3,
            ..TestStruct::default()
        };
        response_bind(&mut exchange, &value);

        assert_eq!(exchange.response_headers().len(), 1);
        assert_eq!(
            exchange.response_header(PUSH_URL_HEADER),
            Some("http://example.com/?int=3&bool=false&float=0")
        );
    }

    #[test]
    fn test_round_trip_through_push_url() {
        let original = TestStruct {
            string_value: "a b/c".to_string(),
            int_value: -12,
            bool_value: true,
            float_value: 0.125,
            slice_value: vec![4, 5],
        };

        let mut exchange = request("/r");
        response_bind(&mut exchange, &original);
        let pushed = exchange.response_header(PUSH_URL_HEADER).unwrap().to_string();

        let next = request("/fragment").with_header("Referer", pushed);
        let bound: TestStruct = bind(&next).unwrap();
        assert_eq!(bound, original);
    }
}
