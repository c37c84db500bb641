//! Registration site endpoints and form payloads
//!
//! Field names, their order and the dummy/blank values are what the site's
//! search handlers expect. They are reproduced exactly; changing any of them
//! makes the site reject or misread the request.

use crate::config::SourceConfig;
use url::Url;

const SELECT_TERM: &str = "bwysched.p_select_term";
const SEARCH_FIELDS: &str = "bwysched.p_search_fields";
const COURSE_SEARCH: &str = "bwysched.p_course_search";
const DISPLAY_COURSE: &str = "bwysched.p_display_course";

/// Day-of-week flags, all set so every section matches
const SEARCH_DAYS: [&str; 7] = ["m", "t", "w", "r", "f", "s", "u"];

/// Fields the course search requires but ignores; sent with the value "dummy"
const DUMMY_FIELDS: [&str; 21] = [
    "sel_aud",
    "sel_subj",
    "sel_camp",
    "sel_sess",
    "sel_attr",
    "sel_levl",
    "sel_schd",
    "sel_insm",
    "sel_link",
    "sel_wait",
    "sel_day",
    "sel_begin_hh",
    "sel_begin_mi",
    "sel_begin_am_pm",
    "sel_end_hh",
    "sel_end_mi",
    "sel_end_am_pm",
    "sel_instruct",
    "sel_special",
    "sel_resd",
    "sel_breadth",
];

/// Fields the course search requires with an empty value
const BLANK_FIELDS: [&str; 7] = [
    "ws_numb",
    "sel_number",
    "sel_crn",
    "sel_sess",
    "sel_schd",
    "sel_instruct",
    "block_button",
];

/// URLs and form bodies for one registration site
#[derive(Debug, Clone)]
pub struct SourceEndpoints {
    base_url: Url,
    wsea_code: String,
}

impl SourceEndpoints {
    /// Creates endpoints from the source configuration
    ///
    /// `base_url` must end in '/' so that endpoint names join under it; the
    /// config loader guarantees this.
    pub fn new(config: &SourceConfig) -> Result<Self, url::ParseError> {
        Ok(Self {
            base_url: Url::parse(&config.base_url)?,
            wsea_code: config.wsea_code.clone(),
        })
    }

    /// Term-selection page (GET)
    pub fn select_term_url(&self) -> String {
        let mut url = self.endpoint(SELECT_TERM);
        url.query_pairs_mut().append_pair("wsea_code", &self.wsea_code);
        url.to_string()
    }

    /// Subject listing (POST)
    pub fn search_fields_url(&self) -> String {
        self.endpoint(SEARCH_FIELDS).to_string()
    }

    /// Course search (POST)
    pub fn course_search_url(&self) -> String {
        self.endpoint(COURSE_SEARCH).to_string()
    }

    /// Course detail page (GET)
    pub fn display_course_url(&self, term_code: &str, session_token: &str, crn: &str) -> String {
        let mut url = self.endpoint(DISPLAY_COURSE);
        url.query_pairs_mut()
            .append_pair("wsea_code", &self.wsea_code)
            .append_pair("term_code", term_code)
            .append_pair("disp", session_token)
            .append_pair("crn", crn);
        url.to_string()
    }

    /// Form body for the subject listing of one term
    pub fn search_fields_form(
        &self,
        term_code: &str,
        session_token: &str,
    ) -> Vec<(&'static str, String)> {
        vec![
            ("wsea_code", self.wsea_code.clone()),
            ("session_id", session_token.to_string()),
            ("term_code", term_code.to_string()),
        ]
    }

    /// Form body for the course search of one (term, subject)
    pub fn course_search_form(
        &self,
        term_code: &str,
        subject: &str,
        session_token: &str,
    ) -> Vec<(&'static str, String)> {
        let mut form = vec![
            ("wsea_code", self.wsea_code.clone()),
            ("term_code", term_code.to_string()),
            ("session_id", session_token.to_string()),
            ("sel_subj", subject.to_string()),
            ("sel_special", "N".to_string()),
            ("sel_begin_hh", "0".to_string()),
            ("sel_begin_mi", "0".to_string()),
            ("sel_begin_am_pm", "a".to_string()),
            ("sel_end_hh", "0".to_string()),
            ("sel_end_mi", "0".to_string()),
            ("sel_end_am_pm", "a".to_string()),
        ];

        form.extend(SEARCH_DAYS.iter().map(|day| ("sel_day", day.to_string())));
        form.extend(DUMMY_FIELDS.iter().map(|field| (*field, "dummy".to_string())));
        form.extend(BLANK_FIELDS.iter().map(|field| (*field, String::new())));

        form
    }

    fn endpoint(&self, name: &str) -> Url {
        let mut url = self.base_url.clone();
        url.set_query(None);
        url.set_fragment(None);
        url.path_segments_mut()
            .map(|mut segments| {
                segments.pop_if_empty().push(name);
            })
            .ok();
        url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn endpoints() -> SourceEndpoints {
        SourceEndpoints::new(&SourceConfig::default()).unwrap()
    }

    #[test]
    fn test_select_term_url() {
        assert_eq!(
            endpoints().select_term_url(),
            "https://central.carleton.ca/prod/bwysched.p_select_term?wsea_code=EXT"
        );
    }

    #[test]
    fn test_post_urls() {
        let endpoints = endpoints();
        assert_eq!(
            endpoints.search_fields_url(),
            "https://central.carleton.ca/prod/bwysched.p_search_fields"
        );
        assert_eq!(
            endpoints.course_search_url(),
            "https://central.carleton.ca/prod/bwysched.p_course_search"
        );
    }

    #[test]
    fn test_display_course_url() {
        assert_eq!(
            endpoints().display_course_url("202330", "20666006", "30001"),
            "https://central.carleton.ca/prod/bwysched.p_display_course?wsea_code=EXT&term_code=202330&disp=20666006&crn=30001"
        );
    }

    #[test]
    fn test_search_fields_form() {
        let form = endpoints().search_fields_form("202330", "20666066");
        assert_eq!(
            form,
            vec![
                ("wsea_code", "EXT".to_string()),
                ("session_id", "20666066".to_string()),
                ("term_code", "202330".to_string()),
            ]
        );
    }

    #[test]
    fn test_course_search_form_layout() {
        let form = endpoints().course_search_form("202330", "COMP", "20666066");

        assert_eq!(form.len(), 11 + 7 + 21 + 7);
        assert_eq!(form[3], ("sel_subj", "COMP".to_string()));

        let days: Vec<&str> = form
            .iter()
            .filter(|(key, value)| *key == "sel_day" && value != "dummy")
            .map(|(_, value)| value.as_str())
            .collect();
        assert_eq!(days, SEARCH_DAYS.to_vec());

        // The real subject comes before its dummy twin
        let subjects: Vec<&str> = form
            .iter()
            .filter(|(key, _)| *key == "sel_subj")
            .map(|(_, value)| value.as_str())
            .collect();
        assert_eq!(subjects, vec!["COMP", "dummy"]);

        assert_eq!(form.last(), Some(&("block_button", String::new())));
    }
}
