use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

/// The subset of a Trello board export this tool reads. Everything else in
/// the file is ignored by serde.
#[derive(Debug, Deserialize)]
pub struct TrelloExport {
    #[serde(default)]
    pub lists: Vec<TrelloList>,
    #[serde(default)]
    pub labels: Vec<TrelloLabel>,
    #[serde(default)]
    pub cards: Vec<TrelloCard>,
    #[serde(default)]
    pub actions: Vec<TrelloAction>,
}

#[derive(Debug, Deserialize)]
pub struct TrelloList {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct TrelloLabel {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrelloCard {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub desc: String,
    pub id_list: Option<String>,
    #[serde(default)]
    pub id_labels: Vec<String>,
    pub id_short: i64,
}

#[derive(Debug, Deserialize)]
pub struct TrelloAction {
    #[serde(rename = "type")]
    pub action_type: String,
    pub date: String,
    #[serde(default)]
    pub data: ActionData,
    #[serde(rename = "memberCreator")]
    pub member_creator: Option<MemberCreator>,
}

#[derive(Debug, Deserialize, Default)]
pub struct ActionData {
    pub card: Option<ActionCard>,
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ActionCard {
    pub id: String,
}

#[derive(Debug, Deserialize)]
pub struct MemberCreator {
    #[serde(rename = "fullName")]
    pub full_name: String,
}

pub fn load(path: &Path) -> Result<TrelloExport> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read Trello export from {}", path.display()))?;
    let export: TrelloExport = serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse Trello export {}", path.display()))?;
    Ok(export)
}
