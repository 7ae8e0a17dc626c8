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

use std::time::{Duration, Instant};

/// The profile of a user, either global or as seen in a single room.
#[derive(Clone, Debug, Default)]
pub struct Profile {
    /// The display name of the user.
    pub display_name: Option<String>,
    /// The `mxc://` URL of the user's avatar.
    pub avatar_url: Option<String>,
    last_update: Option<Instant>,
}

impl Profile {
    /// Create a profile updated just now.
    pub fn new(display_name: Option<String>, avatar_url: Option<String>) -> Self {
        Self { display_name, avatar_url, last_update: Some(Instant::now()) }
    }

    /// Replace the display name and avatar and bump the update time.
    pub fn update(&mut self, display_name: Option<String>, avatar_url: Option<String>) {
        self.display_name = display_name;
        self.avatar_url = avatar_url;
        self.touch();
    }

    pub(crate) fn touch(&mut self) {
        self.last_update = Some(Instant::now());
    }

    /// The time the profile was last updated.
    pub fn last_update(&self) -> Option<Instant> {
        self.last_update
    }

    /// How long ago the profile was last updated, `None` if never.
    pub fn age(&self) -> Option<Duration> {
        self.last_update.map(|t| t.elapsed())
    }
}

#[cfg(test)]
mod tests {
    use super::Profile;

    #[test]
    fn default_profile_has_no_age() {
        let mut profile = Profile::default();
        assert!(profile.age().is_none());

        profile.update(Some("Alice".to_owned()), None);
        assert_eq!(profile.display_name.as_deref(), Some("Alice"));
        assert!(profile.age().is_some());
    }
}
