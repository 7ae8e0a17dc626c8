// Copyright 2024 The Matrix.org Foundation C.I.C.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use matrix_client_events::enums::PushRuleKind;
use serde::Serialize;
use serde_json::{json, Value as JsonValue};

use super::{require, Api, ApiRequest};
use crate::Result;

/// A push rule to add.
#[derive(Clone, Debug, Default, Serialize)]
pub struct NewPushRule {
    /// What to do when the rule matches, e.g. `"notify"`.
    pub actions: Vec<JsonValue>,
    /// The conditions of `override` and `underride` rules.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<JsonValue>,
    /// The glob pattern of `content` rules.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    /// Insert the rule before the rule with this id.
    #[serde(skip)]
    pub before: Option<String>,
    /// Insert the rule after the rule with this id.
    #[serde(skip)]
    pub after: Option<String>,
}

fn rule_path<'a>(scope: &'a str, kind: &'a PushRuleKind, rule_id: &'a str) -> Result<[&'a str; 4]> {
    let scope = require(scope, "scope")?;
    let rule_id = require(rule_id, "rule_id")?;
    Ok(["pushrules", scope, kind.as_str(), rule_id])
}

impl Api {
    /// Get all push rules of the user.
    ///
    /// `GET /pushrules/`
    pub async fn get_push_rules(&self) -> Result<JsonValue> {
        self.send(ApiRequest::get(&["pushrules", ""])).await
    }

    /// Get a single push rule.
    ///
    /// `GET /pushrules/{scope}/{kind}/{rule_id}`
    pub async fn get_push_rule(
        &self,
        scope: &str,
        kind: PushRuleKind,
        rule_id: &str,
    ) -> Result<JsonValue> {
        let path = rule_path(scope, &kind, rule_id)?;
        self.send(ApiRequest::get(&path)).await
    }

    /// Add or replace a push rule.
    ///
    /// `PUT /pushrules/{scope}/{kind}/{rule_id}`
    pub async fn add_push_rule(
        &self,
        scope: &str,
        kind: PushRuleKind,
        rule_id: &str,
        rule: &NewPushRule,
    ) -> Result<()> {
        if rule.actions.is_empty() {
            return Err(crate::Error::MissingParameter("actions"));
        }
        if kind == PushRuleKind::Content && rule.pattern.is_none() {
            return Err(crate::Error::MissingParameter("pattern"));
        }

        let path = rule_path(scope, &kind, rule_id)?;
        let request = ApiRequest::put(&path)
            .query_opt("before", rule.before.as_deref())
            .query_opt("after", rule.after.as_deref())
            .json(serde_json::to_value(rule)?);

        let _: JsonValue = self.send(request).await?;
        Ok(())
    }

    /// Remove a push rule.
    ///
    /// `DELETE /pushrules/{scope}/{kind}/{rule_id}`
    pub async fn delete_push_rule(
        &self,
        scope: &str,
        kind: PushRuleKind,
        rule_id: &str,
    ) -> Result<()> {
        let path = rule_path(scope, &kind, rule_id)?;
        let _: JsonValue = self.send(ApiRequest::delete(&path)).await?;
        Ok(())
    }

    /// Enable or disable a push rule.
    ///
    /// `PUT /pushrules/{scope}/{kind}/{rule_id}/enabled`
    pub async fn set_push_rule_enabled(
        &self,
        scope: &str,
        kind: PushRuleKind,
        rule_id: &str,
        enabled: bool,
    ) -> Result<()> {
        let [root, scope, kind, rule_id] = rule_path(scope, &kind, rule_id)?;
        let request = ApiRequest::put(&[root, scope, kind, rule_id, "enabled"])
            .json(json!({ "enabled": enabled }));

        let _: JsonValue = self.send(request).await?;
        Ok(())
    }

    /// Change the actions of a push rule.
    ///
    /// `PUT /pushrules/{scope}/{kind}/{rule_id}/actions`
    pub async fn set_push_rule_actions(
        &self,
        scope: &str,
        kind: PushRuleKind,
        rule_id: &str,
        actions: &[JsonValue],
    ) -> Result<()> {
        if actions.is_empty() {
            return Err(crate::Error::MissingParameter("actions"));
        }

        let [root, scope, kind, rule_id] = rule_path(scope, &kind, rule_id)?;
        let request = ApiRequest::put(&[root, scope, kind, rule_id, "actions"])
            .json(json!({ "actions": actions }));

        let _: JsonValue = self.send(request).await?;
        Ok(())
    }
}
