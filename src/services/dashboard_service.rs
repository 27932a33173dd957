//! 用户仪表盘：名下的名片资料与评价牌

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use ts_rs::TS;

use crate::config::TS_EXPORT_PATH;
use crate::errors::Result;
use crate::storage::{CodeType, NfcCode, Profile, SeaOrmStorage};

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct ProfileCard {
    pub profile: Profile,
    /// 资料所属的码
    pub code: Option<String>,
    pub visits: u64,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct PlaqueCard {
    pub code: NfcCode,
    pub visits: u64,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct Dashboard {
    pub profiles: Vec<ProfileCard>,
    pub plaques: Vec<PlaqueCard>,
}

pub struct DashboardService {
    storage: Arc<SeaOrmStorage>,
}

impl DashboardService {
    pub fn new(storage: Arc<SeaOrmStorage>) -> Self {
        Self { storage }
    }

    pub async fn for_user(&self, user_id: &str) -> Result<Dashboard> {
        let codes = self.storage.codes_owned_by(user_id, None).await?;
        let profiles = self.storage.profiles_owned_by(user_id).await?;

        let code_names: HashMap<&str, &str> = codes
            .iter()
            .map(|c| (c.id.as_str(), c.code.as_str()))
            .collect();

        let mut targets: Vec<String> = profiles.iter().map(|p| p.id.clone()).collect();
        targets.extend(
            codes
                .iter()
                .filter(|c| c.code_type == CodeType::Review)
                .map(|c| c.id.clone()),
        );
        let visits = self.storage.visit_counts(&targets).await?;
        let visits_of = |id: &str| visits.get(id).copied().unwrap_or(0);

        let profile_cards = profiles
            .into_iter()
            .map(|profile| ProfileCard {
                code: code_names
                    .get(profile.code_id.as_str())
                    .map(|c| c.to_string()),
                visits: visits_of(&profile.id),
                profile,
            })
            .collect();

        let plaques = codes
            .iter()
            .filter(|c| c.code_type == CodeType::Review)
            .map(|code| PlaqueCard {
                visits: visits_of(&code.id),
                code: code.clone(),
            })
            .collect();

        Ok(Dashboard {
            profiles: profile_cards,
            plaques,
        })
    }
}
