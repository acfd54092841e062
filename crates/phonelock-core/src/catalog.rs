//! The fixed catalog of apps that post lock-screen notifications.

use serde::{Deserialize, Serialize};

/// One synthetic app, configured once at startup and never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppProfile {
    /// Stable key selecting the app's message templates.
    pub key: String,
    pub display_name: String,
    pub glyph: String,
    pub icon_class: String,
    /// Direct-message senders.
    pub contacts: Vec<String>,
    /// Group conversations. May be empty.
    #[serde(default)]
    pub groups: Vec<String>,
}

impl AppProfile {
    pub fn has_groups(&self) -> bool {
        !self.groups.is_empty()
    }
}

fn profile(
    key: &str,
    display_name: &str,
    glyph: &str,
    icon_class: &str,
    contacts: &[&str],
    groups: &[&str],
) -> AppProfile {
    AppProfile {
        key: key.into(),
        display_name: display_name.into(),
        glyph: glyph.into(),
        icon_class: icon_class.into(),
        contacts: contacts.iter().map(|s| s.to_string()).collect(),
        groups: groups.iter().map(|s| s.to_string()).collect(),
    }
}

/// The built-in app catalog.
pub fn builtin_catalog() -> Vec<AppProfile> {
    vec![
        profile(
            "instagram",
            "Instagram",
            "📸",
            "icon-ig",
            &[
                "@soph.h", "@micah.j", "@aiden.mp4", "@livvy", "@noah.k", "@mia.rose", "@kenzie",
                "@jayden",
            ],
            &["@roomies", "@studio.crew", "@club.officers", "@gradshow2025"],
        ),
        profile(
            "tiktok",
            "TikTok",
            "🎵",
            "icon-tok",
            &[
                "@chloexyz",
                "@campusmemes",
                "@partyplug",
                "@benji",
                "@ari.mov",
                "@samuel",
            ],
            &["@groupchat", "@dorm12b"],
        ),
        profile(
            "x",
            "X",
            "🕊️",
            "icon-x",
            &["@campusnews", "@prof_smith", "@em.k", "@matt", "@ella"],
            &["@cs101group", "@intramurals"],
        ),
        profile(
            "discord",
            "Discord",
            "🎮",
            "icon-disc",
            &["Riley", "Jamie", "Alex", "Taylor", "Jordan", "Ava", "Chris"],
            &[
                "Server • CS Club",
                "Group • Roomies",
                "#project-lab",
                "#late-night",
                "Server • Game Night",
            ],
        ),
        profile(
            "snapchat",
            "Snapchat",
            "👻",
            "icon-snap",
            &[
                "Ava", "Chris", "Jordan", "Bestie", "Maya", "Ethan", "Sofia", "Liam",
            ],
            &["Roomies", "Brunch Girls", "Gym Buddies"],
        ),
        profile(
            "linkedin",
            "LinkedIn",
            "💼",
            "icon-linkedin",
            &[
                "Dana P.", "Alex P.", "Jordan W.", "Taylor M.", "Maya R.", "Ethan K.", "Sofia L.",
                "Noah S.",
            ],
            &[],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_has_six_apps() {
        assert_eq!(builtin_catalog().len(), 6);
    }

    #[test]
    fn every_profile_has_contacts() {
        for app in builtin_catalog() {
            assert!(!app.contacts.is_empty(), "{} has no contacts", app.key);
        }
    }

    #[test]
    fn linkedin_has_no_groups() {
        let catalog = builtin_catalog();
        let linkedin = catalog.iter().find(|a| a.key == "linkedin").unwrap();
        assert!(!linkedin.has_groups());
    }
}
