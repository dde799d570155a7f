//! Bulk reads of bot, map and language configuration.

use std::collections::BTreeMap;

use crate::query_utils::{normalize_name, quote};
use crate::results::ResultSet;
use crate::task::{Operation, OperationKind, Runner};

/// Configuration entries whose value is a block of lines.
pub const TEXT_CONFIG_NAMES: [&str; 3] = ["motd", "gameloaded", "gameover"];

fn pairs(rows: &ResultSet) -> BTreeMap<String, String> {
    rows.rows_of_width(2)
        .map(|row| (row.string(0), row.string(1)))
        .collect()
}

/// Every `cfg_name -> cfg_value` entry for this bot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BotConfigs;

impl Operation for BotConfigs {
    const KIND: OperationKind = OperationKind::BotConfigs;
    type Output = BTreeMap<String, String>;

    fn fallback(&self) -> Self::Output {
        BTreeMap::new()
    }

    fn run(self, runner: &mut Runner<'_>) -> Self::Output {
        let sql = format!(
            "SELECT cfg_name, cfg_value FROM bot_configuration WHERE cfg_botid = {}",
            runner.bot_id()
        );
        runner.query(&sql).map(|rows| pairs(&rows)).unwrap_or_default()
    }
}

/// The multi-line text entries of this bot's configuration, split into lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BotConfigTexts;

impl Operation for BotConfigTexts {
    const KIND: OperationKind = OperationKind::BotConfigTexts;
    type Output = BTreeMap<String, Vec<String>>;

    fn fallback(&self) -> Self::Output {
        BTreeMap::new()
    }

    fn run(self, runner: &mut Runner<'_>) -> Self::Output {
        let names: Vec<String> = TEXT_CONFIG_NAMES.iter().map(|name| quote(name)).collect();
        let sql = format!(
            "SELECT cfg_name, cfg_value FROM bot_configuration WHERE cfg_botid = {} \
             AND cfg_name IN ( {} )",
            runner.bot_id(),
            names.join(", ")
        );
        let Some(rows) = runner.query(&sql) else {
            return BTreeMap::new();
        };
        rows.rows_of_width(2)
            .map(|row| {
                let lines = row.text(1).lines().map(str::to_string).collect();
                (row.string(0), lines)
            })
            .collect()
    }
}

/// Translations grouped by language code, then by translation id.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Languages;

impl Operation for Languages {
    const KIND: OperationKind = OperationKind::Languages;
    type Output = BTreeMap<String, BTreeMap<u32, String>>;

    fn fallback(&self) -> Self::Output {
        BTreeMap::new()
    }

    fn run(self, runner: &mut Runner<'_>) -> Self::Output {
        let sql = "SELECT translation_id, language_code, translation FROM lang_translations";
        let mut languages: Self::Output = BTreeMap::new();
        if let Some(rows) = runner.query(sql) {
            for row in rows.rows_of_width(3) {
                languages
                    .entry(row.string(1))
                    .or_default()
                    .insert(row.u32(0), row.string(2));
            }
        }
        languages
    }
}

/// Key/value settings of one named map configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapConfig {
    pub name: String,
}

impl Operation for MapConfig {
    const KIND: OperationKind = OperationKind::MapConfig;
    type Output = BTreeMap<String, String>;

    fn fallback(&self) -> Self::Output {
        BTreeMap::new()
    }

    fn run(self, runner: &mut Runner<'_>) -> Self::Output {
        let sql = format!(
            "SELECT cfg_key, cfg_value FROM mapcfgs WHERE cfg_name = {}",
            quote(&normalize_name(&self.name))
        );
        runner.query(&sql).map(|rows| pairs(&rows)).unwrap_or_default()
    }
}

/// Alias id to display name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Aliases;

impl Operation for Aliases {
    const KIND: OperationKind = OperationKind::Aliases;
    type Output = BTreeMap<u32, String>;

    fn fallback(&self) -> Self::Output {
        BTreeMap::new()
    }

    fn run(self, runner: &mut Runner<'_>) -> Self::Output {
        let Some(rows) = runner.query("SELECT alias_id, alias_name FROM aliases") else {
            return BTreeMap::new();
        };
        rows.rows_of_width(2)
            .map(|row| (row.u32(0), row.string(1)))
            .collect()
    }
}

/// Alias id to stats template. Aliases without a template are left out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsTemplates;

impl Operation for StatsTemplates {
    const KIND: OperationKind = OperationKind::StatsTemplates;
    type Output = BTreeMap<u32, String>;

    fn fallback(&self) -> Self::Output {
        BTreeMap::new()
    }

    fn run(self, runner: &mut Runner<'_>) -> Self::Output {
        let Some(rows) = runner.query("SELECT alias_id, alias_template FROM aliases") else {
            return BTreeMap::new();
        };
        rows.rows_of_width(2)
            .filter(|row| !row.text(1).is_empty())
            .map(|row| (row.u32(0), row.string(1)))
            .collect()
    }
}
