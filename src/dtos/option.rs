//! Option DTOs - Liste controllate per i menu a tendina

use crate::entities::OptionCategory;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct OptionsDTO {
    pub operators: Vec<String>,
    pub cantieri: Vec<String>,
    pub macchine: Vec<String>,
    pub linee: Vec<String>,
}

impl OptionsDTO {
    pub fn get(&self, category: OptionCategory) -> &Vec<String> {
        match category {
            OptionCategory::Operators => &self.operators,
            OptionCategory::Cantieri => &self.cantieri,
            OptionCategory::Macchine => &self.macchine,
            OptionCategory::Linee => &self.linee,
        }
    }

    pub fn get_mut(&mut self, category: OptionCategory) -> &mut Vec<String> {
        match category {
            OptionCategory::Operators => &mut self.operators,
            OptionCategory::Cantieri => &mut self.cantieri,
            OptionCategory::Macchine => &mut self.macchine,
            OptionCategory::Linee => &mut self.linee,
        }
    }
}

/// Body di POST/DELETE /api/options
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct OptionMutationDTO {
    pub category: Option<String>,
    pub value: Option<String>,
}
