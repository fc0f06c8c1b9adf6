//! Query URL construction for the catalog API

use url::Url;

use crate::app::models::CharacterFilters;
use crate::errors::{FetchError, FetchResult};

/// URL of one page of the character list
///
/// The query always carries `page`, followed by each set filter field in
/// `status`, `species`, `gender`, `name` order. Any query already on `base`
/// is discarded.
pub fn build_characters_url(base: &Url, page: u32, filters: &CharacterFilters) -> Url {
    let mut url = base.clone();
    {
        let mut query = url.query_pairs_mut();
        query.clear();
        query.append_pair("page", &page.to_string());
        for (key, value) in filters.query_pairs() {
            query.append_pair(key, value);
        }
    }
    url
}

/// URL of a single character, e.g. `<base>/42`
pub fn character_url(base: &Url, id: u32) -> FetchResult<Url> {
    with_path_segment(base, &id.to_string())
}

/// URL fetching several characters at once, e.g. `<base>/1,2,3`
pub fn characters_by_ids_url(base: &Url, ids: &[u32]) -> FetchResult<Url> {
    let joined = ids
        .iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(",");
    with_path_segment(base, &joined)
}

fn with_path_segment(base: &Url, segment: &str) -> FetchResult<Url> {
    let mut url = base.clone();
    url.set_query(None);
    url.path_segments_mut()
        .map_err(|_| FetchError::InvalidUrl {
            url: base.to_string(),
            reason: "URL cannot be a base".to_string(),
        })?
        .pop_if_empty()
        .push(segment);
    Ok(url)
}

/// Page number carried by a pagination cursor, if any
pub fn extract_page_from_url(cursor: &str) -> Option<u32> {
    let url = Url::parse(cursor).ok()?;
    let (_, page) = url.query_pairs().find(|(key, _)| key == "page")?;
    page.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://rickandmortyapi.com/api/character").unwrap()
    }

    #[test]
    fn test_page_only_without_filters() {
        let url = build_characters_url(&base(), 1, &CharacterFilters::new());
        assert_eq!(url.as_str(), "https://rickandmortyapi.com/api/character?page=1");
    }

    #[test]
    fn test_filters_appended_in_fixed_order() {
        let filters = CharacterFilters::new()
            .with_name("rick")
            .with_gender("Male")
            .with_species("Human")
            .with_status("Alive");

        let url = build_characters_url(&base(), 3, &filters);
        assert_eq!(
            url.query(),
            Some("page=3&status=Alive&species=Human&gender=Male&name=rick")
        );
    }

    #[test]
    fn test_every_filter_combination_includes_only_set_fields() {
        let values = ["Dead", "Alien", "Female", "morty"];
        for mask in 0u8..16 {
            let mut filters = CharacterFilters::new();
            let pick = |bit: u8| {
                if mask & (1 << bit) != 0 {
                    Some(values[bit as usize].to_string())
                } else {
                    Some(String::new())
                }
            };
            filters.status = pick(0);
            filters.species = pick(1);
            filters.gender = pick(2);
            filters.name = pick(3);

            let url = build_characters_url(&base(), 2, &filters);
            let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();

            assert_eq!(pairs[0], ("page".to_string(), "2".to_string()));
            assert_eq!(pairs.len() - 1, mask.count_ones() as usize);
            assert!(pairs.iter().all(|(_, value)| !value.is_empty()));
        }
    }

    #[test]
    fn test_existing_query_is_replaced() {
        let base = Url::parse("https://example.com/api/character?page=9&status=Dead").unwrap();
        let url = build_characters_url(&base, 1, &CharacterFilters::new());
        assert_eq!(url.query(), Some("page=1"));
    }

    #[test]
    fn test_name_is_percent_encoded() {
        let filters = CharacterFilters::new().with_name("Mr. Poopybutthole & co");
        let url = build_characters_url(&base(), 1, &filters);
        let name = url
            .query_pairs()
            .find(|(key, _)| key == "name")
            .map(|(_, value)| value.into_owned());
        assert_eq!(name.as_deref(), Some("Mr. Poopybutthole & co"));
    }

    #[test]
    fn test_entity_urls() {
        assert_eq!(
            character_url(&base(), 42).unwrap().as_str(),
            "https://rickandmortyapi.com/api/character/42"
        );

        let trailing = Url::parse("https://rickandmortyapi.com/api/character/").unwrap();
        assert_eq!(
            characters_by_ids_url(&trailing, &[1, 2, 3]).unwrap().as_str(),
            "https://rickandmortyapi.com/api/character/1,2,3"
        );
    }

    #[test]
    fn test_extract_page_from_cursor() {
        assert_eq!(
            extract_page_from_url("https://rickandmortyapi.com/api/character?page=2&status=Dead"),
            Some(2)
        );
        assert_eq!(
            extract_page_from_url("https://rickandmortyapi.com/api/character"),
            None
        );
        assert_eq!(extract_page_from_url("not a url"), None);
    }
}
