//! Page lookups over the `pages` global.
//!
//! Sites seed `pages` with their page records (an array, or an object keyed
//! by id). Module tags use these lookups to find the page a template is
//! rendering.

use serde_json::{json, Map, Value};

use crate::condition::{compare, Op};
use crate::value::{to_text, Globals};

/// Global holding the site's page records.
pub const PAGES_GLOBAL: &str = "pages";

/// Menu whose pages are candidates for the home page.
pub const MAIN_MENU_ID: i64 = 1;

/// Page name that stands for the home page.
pub const HOME_ALIAS: &str = "page";

/// Page records in the `pages` global, in order. Non-object entries are
/// skipped.
pub fn pages(globals: &Globals) -> impl Iterator<Item = &Map<String, Value>> {
    let entries: Box<dyn Iterator<Item = &Value> + '_> = match globals.get(PAGES_GLOBAL) {
        Some(Value::Array(list)) => Box::new(list.iter()),
        Some(Value::Object(map)) => Box::new(map.values()),
        _ => Box::new(std::iter::empty()),
    };
    entries.filter_map(Value::as_object)
}

/// The page a request for `name` renders: the home page for [`HOME_ALIAS`],
/// otherwise the page whose `url` is `name`.
pub fn current_page<'g>(globals: &'g Globals, name: &str) -> Option<&'g Map<String, Value>> {
    if name == HOME_ALIAS {
        home_page(globals)
    } else {
        page_by_url(globals, name)
    }
}

/// First main-menu page flagged `home`, else the first main-menu page.
pub fn home_page(globals: &Globals) -> Option<&Map<String, Value>> {
    let mut first = None;
    for page in pages(globals).filter(|p| field_equals(p, "id_menu", &json!(MAIN_MENU_ID))) {
        if field_equals(page, "home", &json!(1)) {
            return Some(page);
        }
        first.get_or_insert(page);
    }
    first
}

/// First page whose `url` is `url`.
pub fn page_by_url<'g>(globals: &'g Globals, url: &str) -> Option<&'g Map<String, Value>> {
    pages(globals).find(|page| page.get("url").map(to_text).as_deref() == Some(url))
}

fn field_equals(page: &Map<String, Value>, field: &str, expected: &Value) -> bool {
    let value = page.get(field).unwrap_or(&Value::Null);
    compare(value, Op::Eq, expected)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn globals(pages: Value) -> Globals {
        let mut globals = Globals::new();
        globals.set(PAGES_GLOBAL, pages);
        globals
    }

    fn site_pages() -> Globals {
        globals(json!([
            {"id_page": 1, "id_menu": 2, "url": "legal", "home": 1},
            {"id_page": 2, "id_menu": 1, "url": "about", "home": 0},
            {"id_page": 3, "id_menu": "1", "url": "welcome", "home": "1"},
            {"id_page": 4, "id_menu": 1, "url": "contact"},
        ]))
    }

    fn id(page: Option<&Map<String, Value>>) -> Option<i64> {
        page.and_then(|p| p.get("id_page")).and_then(Value::as_i64)
    }

    mod home {
        use super::*;

        #[test]
        fn flagged_main_menu_page_wins() {
            assert_eq!(id(home_page(&site_pages())), Some(3));
        }

        #[test]
        fn falls_back_to_first_main_menu_page() {
            let g = globals(json!([
                {"id_page": 7, "id_menu": 2, "home": 1},
                {"id_page": 8, "id_menu": 1, "home": 0},
                {"id_page": 9, "id_menu": 1},
            ]));
            assert_eq!(id(home_page(&g)), Some(8));
        }

        #[test]
        fn none_without_main_menu_pages() {
            let g = globals(json!([{"id_page": 1, "id_menu": 2, "home": 1}]));
            assert_eq!(home_page(&g), None);
            assert_eq!(home_page(&Globals::new()), None);
        }
    }

    mod lookup {
        use super::*;

        #[test]
        fn by_url() {
            assert_eq!(id(page_by_url(&site_pages(), "contact")), Some(4));
            assert_eq!(page_by_url(&site_pages(), "missing"), None);
        }

        #[test]
        fn current_page_aliases_home() {
            let g = site_pages();
            assert_eq!(id(current_page(&g, HOME_ALIAS)), Some(3));
            assert_eq!(id(current_page(&g, "about")), Some(2));
            assert_eq!(current_page(&g, "nowhere"), None);
        }

        #[test]
        fn pages_keyed_by_id() {
            let g = globals(json!({
                "10": {"id_page": 10, "id_menu": 1, "url": "home"},
                "11": "not a page",
            }));
            assert_eq!(pages(&g).count(), 1);
            assert_eq!(id(page_by_url(&g, "home")), Some(10));
        }
    }
}
