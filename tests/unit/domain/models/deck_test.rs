// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 卡组模型测试
#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use deck_harvester::domain::identity::deck_id;
    use deck_harvester::domain::models::deck::{DeckComposition, DeckRecord, DeckSummary, DeckType};
    use deck_harvester::domain::models::message::{MessageType, QueueMessage};
    use deck_harvester::utils::errors::ValidationError;

    const GOLDEN_DECK: &str = include_str!("../../../fixtures/test_deck.json");

    fn summary() -> DeckSummary {
        DeckSummary::new(
            "https://www.mtgtop8.com/event?e=31427&d=440512&f=MO",
            "5-0",
            "01/09/21",
            "kanister",
            "MTGO Modern Preliminary",
            "Burn",
        )
        .unwrap()
    }

    #[test]
    fn test_relative_link_is_rejected() {
        let err = DeckSummary::new("event?e=1", "1", "01/09/21", "p", "e", "d").unwrap_err();

        assert_eq!(err, ValidationError::InvalidLink("event?e=1".to_string()));
    }

    #[test]
    fn test_record_gets_identity_on_creation() {
        let record = DeckRecord::new(summary());

        assert_eq!(record.deck_id, deck_id("kanister", "01/09/21", "MTGO Modern Preliminary"));
        assert_eq!(record.deck_id, "2296ba10");
        assert!(!record.is_enriched());
    }

    #[test]
    fn test_unenriched_record_omits_cards_and_type() {
        let value = serde_json::to_value(DeckRecord::new(summary())).unwrap();

        assert!(value.get("cards").is_none());
        assert!(value.get("type").is_none());
        assert_eq!(value["deck_name"], "Burn");
    }

    #[test]
    fn test_golden_deck_parses() {
        let record: DeckRecord = serde_json::from_str(GOLDEN_DECK).unwrap();

        assert_eq!(record.summary, summary());
        assert_eq!(record.deck_type, Some(DeckType::Named("Burn".to_string())));
        assert!(record.cards.as_deref().unwrap().starts_with("4 Goblin Guide;\n"));
    }

    #[test]
    fn test_unknown_type_round_trips() {
        let record = DeckRecord::new(summary()).with_composition(DeckComposition {
            cards: "1 Island;\n".to_string(),
            deck_type: DeckType::Unknown,
        });

        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains(r#""type":"unknown""#));

        let back: DeckRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
        assert!(back.deck_type.unwrap().is_unknown());
    }

    #[test]
    fn test_full_deck_message() {
        let record = DeckRecord::new(summary());
        let now = Utc.with_ymd_and_hms(2021, 9, 27, 12, 0, 0).unwrap();

        let message = QueueMessage::full_deck(&record, now).unwrap();

        assert_eq!(message.msg_type(), MessageType::FullDeck);
        assert_eq!(message.attributes.date_added, "27/09/21");
        assert_eq!(message.decode::<DeckRecord>().unwrap(), record);
        assert_eq!(
            serde_json::to_value(&message.attributes).unwrap()["msg_type"],
            "full_deck"
        );
    }
}
