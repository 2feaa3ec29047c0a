pub const DEFAULT_PAGE_SIZE: u32 = 12;

/// One page of a paginated listing
#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    #[serde(alias = "items")]
    pub content: Vec<T>,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub total_elements: u64,
    /// zero-based
    #[serde(default, alias = "page")]
    pub number: u32,
}

impl<T> Page<T> {
    pub fn empty() -> Page<T> {
        Page {
            content: Vec::new(),
            total_pages: 0,
            total_elements: 0,
            number: 0,
        }
    }

    pub fn has_next(&self) -> bool {
        self.number + 1 < self.total_pages
    }

    pub fn has_prev(&self) -> bool {
        self.number > 0
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

/// Query parameters of a listing `GET`
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ListQuery {
    pub page: u32,
    pub size: u32,
    pub search: Option<String>,
    pub sort: Option<(String, SortOrder)>,
}

impl Default for ListQuery {
    fn default() -> ListQuery {
        ListQuery {
            page: 0,
            size: DEFAULT_PAGE_SIZE,
            search: None,
            sort: None,
        }
    }
}

impl ListQuery {
    /// Changing the filter always goes back to the first page
    pub fn with_search(&self, search: &str) -> ListQuery {
        let search = search.trim();
        ListQuery {
            page: 0,
            search: (!search.is_empty()).then(|| String::from(search)),
            ..self.clone()
        }
    }

    pub fn with_sort(&self, field: &str, order: SortOrder) -> ListQuery {
        ListQuery {
            page: 0,
            sort: Some((String::from(field), order)),
            ..self.clone()
        }
    }

    pub fn with_page(&self, page: u32) -> ListQuery {
        ListQuery {
            page,
            ..self.clone()
        }
    }

    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut res = vec![("page", self.page.to_string()), ("size", self.size.to_string())];
        if let Some(s) = &self.search {
            res.push(("search", s.clone()));
        }
        if let Some((field, order)) = &self.sort {
            res.push(("sort", format!("{},{}", field, order.as_str())));
        }
        res
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_spring_page() {
        let p: Page<u32> = serde_json::from_str(
            r#"{"content":[1,2],"totalPages":3,"totalElements":5,"number":1,"size":2}"#,
        )
        .unwrap();
        assert_eq!(p.content, vec![1, 2]);
        assert!(p.has_next());
        assert!(p.has_prev());
    }

    #[test]
    fn parses_items_alias() {
        let p: Page<u32> = serde_json::from_str(r#"{"items":[7],"page":0}"#).unwrap();
        assert_eq!(p.content, vec![7]);
        assert!(!p.has_next());
    }

    #[test]
    fn search_resets_page() {
        let q = ListQuery::default().with_page(4).with_search("  rust ");
        assert_eq!(q.page, 0);
        assert_eq!(
            q.to_pairs(),
            vec![
                ("page", String::from("0")),
                ("size", String::from("12")),
                ("search", String::from("rust")),
            ]
        );
        assert_eq!(q.with_search("").search, None);
    }

    #[test]
    fn sort_is_spring_formatted() {
        let q = ListQuery::default().with_sort("createdAt", SortOrder::Desc);
        assert!(q.to_pairs().contains(&("sort", String::from("createdAt,desc"))));
    }
}
