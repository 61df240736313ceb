// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 查询模型测试
#[cfg(test)]
mod tests {
    use deck_harvester::domain::models::query::{Format, PageQuery, SearchTemplate};
    use deck_harvester::utils::errors::ValidationError;
    use serde_json::json;
    use std::str::FromStr;

    #[test]
    fn test_format_codes() {
        assert_eq!(Format::from_str("MO").unwrap(), Format::Modern);
        assert_eq!(Format::from_str("cEDH").unwrap().code(), "cEDH");
        assert_eq!(Format::Pauper.to_string(), "PAU");
        assert_eq!(
            Format::from_str("XX").unwrap_err(),
            ValidationError::UnknownFormat("XX".to_string())
        );
    }

    #[test]
    fn test_template_accepts_two_and_four_digit_years() {
        assert!(SearchTemplate::new(Format::Modern, "25/09/2021", "27/09/2021").is_ok());
        assert!(SearchTemplate::new(Format::Modern, "25/09/21", "27/09/21").is_ok());
    }

    #[test]
    fn test_template_rejects_bad_dates() {
        assert!(matches!(
            SearchTemplate::new(Format::Modern, "2021-09-25", "27/09/2021"),
            Err(ValidationError::InvalidDate { field: "date_start", .. })
        ));
        assert!(matches!(
            SearchTemplate::new(Format::Modern, "28/09/2021", "27/09/2021"),
            Err(ValidationError::InvertedDateRange { .. })
        ));
    }

    #[test]
    fn test_template_from_submission_json() {
        let template: SearchTemplate = serde_json::from_value(json!({
            "format": "LE",
            "date_start": "01/01/2021",
            "date_end": "31/01/2021",
            "current_page": 4,
            "player": "someone"
        }))
        .unwrap();

        assert_eq!(template.format(), Format::Legacy);
        assert_eq!(template.filters().get("player").unwrap(), "someone");
        assert!(!template.filters().contains_key("current_page"));
    }

    #[test]
    fn test_filters_cannot_shadow_form_fields() {
        let template = SearchTemplate::new(Format::Modern, "25/09/2021", "27/09/2021").unwrap();

        for key in ["format", "date_start", "date_end", "current_page"] {
            assert_eq!(
                template.clone().with_filter(key, "1").unwrap_err(),
                ValidationError::ReservedFilter(key.to_string())
            );
        }
        assert_eq!(
            template.with_filter(" ", "x").unwrap_err(),
            ValidationError::EmptyField("filter key")
        );
    }

    #[test]
    fn test_page_query_json_is_flat() {
        let template = SearchTemplate::new(Format::Modern, "25/09/2021", "27/09/2021")
            .unwrap()
            .with_filter("event_titre", "Challenge")
            .unwrap();
        let query = PageQuery::new(template, 3).unwrap();

        let value = serde_json::to_value(&query).unwrap();

        assert_eq!(
            value,
            json!({
                "format": "MO",
                "date_start": "25/09/2021",
                "date_end": "27/09/2021",
                "event_titre": "Challenge",
                "current_page": 3
            })
        );
        let back: PageQuery = serde_json::from_value(value).unwrap();
        assert_eq!(back, query);
    }

    #[test]
    fn test_page_zero_is_invalid() {
        let template = SearchTemplate::new(Format::Modern, "25/09/2021", "27/09/2021").unwrap();

        assert_eq!(PageQuery::new(template, 0).unwrap_err(), ValidationError::InvalidPage);
    }

    #[test]
    fn test_form_fields_end_with_page() {
        let template = SearchTemplate::new(Format::Pioneer, "01/02/2022", "03/02/2022").unwrap();
        let fields = PageQuery::new(template, 2).unwrap().form_fields();

        assert_eq!(fields.first().unwrap(), &("format".to_string(), "PI".to_string()));
        assert_eq!(fields.last().unwrap(), &("current_page".to_string(), "2".to_string()));
    }
}
