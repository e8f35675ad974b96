use std::collections::HashMap;

use chrono::DateTime;
use tracing::warn;

use crate::export::TrelloExport;
use crate::model::card::{Card, Comment};

/// Transform the raw export collections into the sorted card model.
///
/// Pure data transformation: no I/O, no network. Unresolvable
/// cross-references (unknown list/label id, comment pointing at a card that
/// isn't in the export, unparseable comment date) are warned about and
/// dropped rather than aborting the build.
pub fn build_cards(export: &TrelloExport) -> Vec<Card> {
    let list_names: HashMap<&str, &str> = export
        .lists
        .iter()
        .map(|l| (l.id.as_str(), l.name.as_str()))
        .collect();
    let label_names: HashMap<&str, &str> = export
        .labels
        .iter()
        .map(|l| (l.id.as_str(), l.name.as_str()))
        .collect();

    let mut cards: Vec<Card> = Vec::with_capacity(export.cards.len());
    let mut index_by_id: HashMap<&str, usize> = HashMap::with_capacity(export.cards.len());

    for raw in &export.cards {
        let mut labels = Vec::new();
        if let Some(id_list) = &raw.id_list {
            match list_names.get(id_list.as_str()) {
                Some(name) => labels.push((*name).to_string()),
                None => warn!(card = %raw.id, list = %id_list, "unknown list id, skipping list label"),
            }
        }
        for id_label in &raw.id_labels {
            match label_names.get(id_label.as_str()) {
                Some(name) => labels.push((*name).to_string()),
                None => warn!(card = %raw.id, label = %id_label, "unknown label id, skipping"),
            }
        }

        index_by_id.insert(raw.id.as_str(), cards.len());
        cards.push(Card {
            source_id: raw.id.clone(),
            title: raw.name.clone(),
            body: raw.desc.clone(),
            labels,
            ordinal: raw.id_short,
            comments: Vec::new(),
        });
    }

    for action in &export.actions {
        // Unknown action types are expected in a full export; only comments matter.
        if action.action_type != "commentCard" {
            continue;
        }
        let Some(card_id) = action.data.card.as_ref().map(|c| c.id.as_str()) else {
            warn!(date = %action.date, "comment action without card reference, skipping");
            continue;
        };
        let Some(&idx) = index_by_id.get(card_id) else {
            warn!(card = %card_id, date = %action.date, "comment references unknown card, skipping");
            continue;
        };
        let epoch = match DateTime::parse_from_rfc3339(&action.date) {
            Ok(ts) => ts.timestamp_millis(),
            Err(err) => {
                warn!(card = %card_id, date = %action.date, %err, "unparseable comment date, skipping");
                continue;
            }
        };
        cards[idx].comments.push(Comment {
            author_name: action
                .member_creator
                .as_ref()
                .map(|m| m.full_name.clone())
                .unwrap_or_default(),
            date: action.date.clone(),
            epoch,
            text: action.data.text.clone().unwrap_or_default(),
        });
    }

    // Both sorts are stable, so ties keep their original export order.
    for card in &mut cards {
        card.comments.sort_by_key(|c| c.epoch);
    }
    cards.sort_by_key(|c| c.ordinal);

    cards
}
