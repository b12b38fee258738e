//! Partial configuration records and the one-level merge.
//!
//! Merge semantics: scalar and list-valued fields replace wholesale;
//! object-valued fields merge one level deep, key by key. Applying the same
//! patch twice yields the same result.

use serde::{Deserialize, Serialize};

use super::{Category, RatingScale, UserInfo, WidgetConfig};

/// Partial top-level configuration, e.g. from the host page or a remote
/// widget-config override.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConfigPatch {
    pub api_key: Option<String>,
    pub website_id: Option<String>,
    pub api_url: Option<String>,
    #[serde(rename = "timeout")]
    pub timeout_ms: Option<u64>,
    pub theme: Option<ThemePatch>,
    pub position: Option<PositionPatch>,
    pub size: Option<SizePatch>,
    pub z_index: Option<i64>,
    pub trigger: Option<TriggerPatch>,
    pub text: Option<TextPatch>,
    /// Replaces the category list wholesale; entries are never merged.
    pub categories: Option<Vec<Category>>,
    pub rating_scale: Option<RatingScale>,
    pub auto_show: Option<bool>,
    #[serde(rename = "autoShowDelay")]
    pub auto_show_delay_ms: Option<u64>,
    pub user: Option<UserInfo>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ThemePatch {
    pub primary_color: Option<String>,
    pub background_color: Option<String>,
    pub text_color: Option<String>,
    pub border_color: Option<String>,
    pub border_radius: Option<String>,
    pub font_family: Option<String>,
    pub font_size: Option<String>,
    pub header_background_color: Option<String>,
    pub footer_background_color: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PositionPatch {
    pub top: Option<String>,
    pub bottom: Option<String>,
    pub left: Option<String>,
    pub right: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SizePatch {
    pub width: Option<String>,
    pub height: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TriggerPatch {
    pub icon: Option<String>,
    pub size: Option<String>,
    pub icon_size: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TextPatch {
    pub title: Option<String>,
    pub rating_label: Option<String>,
    pub feedback_label: Option<String>,
    pub feedback_placeholder: Option<String>,
    pub category_label: Option<String>,
    pub submit_button: Option<String>,
    pub cancel_button: Option<String>,
}

macro_rules! apply_keys {
    ($patch:expr, $target:expr, [$($field:ident),+ $(,)?]) => {
        $(
            if let Some(value) = &$patch.$field {
                $target.$field = value.clone();
            }
        )+
    };
}

impl WidgetConfig {
    /// Merge a partial configuration over this one, producing a new record.
    ///
    /// Pure: neither input is modified. The result still has to pass
    /// [`WidgetConfig::ensure_valid`] before it may drive a widget.
    pub fn merge(&self, patch: &ConfigPatch) -> WidgetConfig {
        let mut merged = self.clone();

        if let Some(v) = &patch.api_key {
            merged.api_key = v.clone();
        }
        if let Some(v) = &patch.website_id {
            merged.website_id = v.clone();
        }
        if let Some(v) = &patch.api_url {
            merged.api_url = v.clone();
        }
        if let Some(v) = patch.timeout_ms {
            merged.timeout_ms = v;
        }
        if let Some(theme) = &patch.theme {
            apply_keys!(theme, merged.theme, [
                primary_color,
                background_color,
                text_color,
                border_color,
                border_radius,
                font_family,
                font_size,
                header_background_color,
                footer_background_color,
            ]);
        }
        if let Some(position) = &patch.position {
            if position.top.is_some() {
                merged.position.top = position.top.clone();
            }
            if position.bottom.is_some() {
                merged.position.bottom = position.bottom.clone();
            }
            if position.left.is_some() {
                merged.position.left = position.left.clone();
            }
            if position.right.is_some() {
                merged.position.right = position.right.clone();
            }
        }
        if let Some(size) = &patch.size {
            apply_keys!(size, merged.size, [width, height]);
        }
        if let Some(v) = patch.z_index {
            merged.z_index = v;
        }
        if let Some(trigger) = &patch.trigger {
            apply_keys!(trigger, merged.trigger, [icon, size, icon_size]);
        }
        if let Some(text) = &patch.text {
            apply_keys!(text, merged.text, [
                title,
                rating_label,
                feedback_label,
                feedback_placeholder,
                category_label,
                submit_button,
                cancel_button,
            ]);
        }
        if let Some(categories) = &patch.categories {
            merged.categories = categories.clone();
        }
        if let Some(v) = patch.rating_scale {
            merged.rating_scale = v;
        }
        if let Some(v) = patch.auto_show {
            merged.auto_show = v;
        }
        if let Some(v) = patch.auto_show_delay_ms {
            merged.auto_show_delay_ms = v;
        }
        if let Some(user) = &patch.user {
            merged.user.merge_from(user);
        }

        merged
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_merges_one_level() {
        let base = WidgetConfig::default();
        let patch = ConfigPatch {
            theme: Some(ThemePatch {
                primary_color: Some("#ff0000".to_string()),
                ..ThemePatch::default()
            }),
            ..ConfigPatch::default()
        };

        let merged = base.merge(&patch);
        assert_eq!(merged.theme.primary_color, "#ff0000");
        // Untouched theme keys keep the defaults, not empty values.
        assert_eq!(merged.theme.background_color, base.theme.background_color);
        assert_eq!(merged.theme.font_size, base.theme.font_size);
    }

    #[test]
    fn test_scalars_replace_wholesale() {
        let base = WidgetConfig::default();
        let patch = ConfigPatch {
            api_key: Some("key-123".to_string()),
            timeout_ms: Some(4000),
            z_index: Some(10),
            auto_show: Some(true),
            ..ConfigPatch::default()
        };

        let merged = base.merge(&patch);
        assert_eq!(merged.api_key, "key-123");
        assert_eq!(merged.timeout_ms, 4000);
        assert_eq!(merged.z_index, 10);
        assert!(merged.auto_show);
        // Unpatched scalars keep base values.
        assert_eq!(merged.website_id, base.website_id);
        assert_eq!(merged.auto_show_delay_ms, base.auto_show_delay_ms);
    }

    #[test]
    fn test_categories_replace_not_append() {
        let base = WidgetConfig {
            categories: vec![Category {
                value: "bug".to_string(),
                label: "Bug Report".to_string(),
            }],
            ..WidgetConfig::default()
        };
        let patch = ConfigPatch {
            categories: Some(vec![Category {
                value: "idea".to_string(),
                label: "Idea".to_string(),
            }]),
            ..ConfigPatch::default()
        };

        let merged = base.merge(&patch);
        assert_eq!(merged.categories.len(), 1);
        assert_eq!(merged.categories[0].value, "idea");
    }

    #[test]
    fn test_merge_is_idempotent() {
        let base = WidgetConfig::default();
        let patch = ConfigPatch {
            api_key: Some("key-123".to_string()),
            theme: Some(ThemePatch {
                text_color: Some("black".to_string()),
                ..ThemePatch::default()
            }),
            categories: Some(vec![Category {
                value: "bug".to_string(),
                label: "Bug".to_string(),
            }]),
            ..ConfigPatch::default()
        };

        let once = base.merge(&patch);
        let twice = once.merge(&patch);
        assert_eq!(
            serde_json::to_value(&once).unwrap(),
            serde_json::to_value(&twice).unwrap()
        );
    }

    #[test]
    fn test_position_patch_sets_new_sides() {
        let base = WidgetConfig::default();
        let patch = ConfigPatch {
            position: Some(PositionPatch {
                top: Some("10px".to_string()),
                left: Some("10px".to_string()),
                ..PositionPatch::default()
            }),
            ..ConfigPatch::default()
        };

        let merged = base.merge(&patch);
        assert_eq!(merged.position.top.as_deref(), Some("10px"));
        // Defaults on the untouched sides survive.
        assert_eq!(merged.position.bottom.as_deref(), Some("20px"));
    }

    #[test]
    fn test_user_merges_per_key() {
        let base = WidgetConfig {
            user: UserInfo {
                id: Some("u-1".to_string()),
                email: Some("a@example.com".to_string()),
                ..UserInfo::default()
            },
            ..WidgetConfig::default()
        };
        let patch = ConfigPatch {
            user: Some(UserInfo {
                name: Some("Ada".to_string()),
                ..UserInfo::default()
            }),
            ..ConfigPatch::default()
        };

        let merged = base.merge(&patch);
        assert_eq!(merged.user.id.as_deref(), Some("u-1"));
        assert_eq!(merged.user.email.as_deref(), Some("a@example.com"));
        assert_eq!(merged.user.name.as_deref(), Some("Ada"));
    }

    #[test]
    fn test_patch_deserializes_wire_names() {
        let json = r##"{
            "apiKey": "key-123",
            "timeout": 5000,
            "theme": {"primaryColor": "#222222"},
            "categories": [{"value": "bug", "label": "Bug Report"}]
        }"##;
        let patch: ConfigPatch = serde_json::from_str(json).unwrap();
        assert_eq!(patch.api_key.as_deref(), Some("key-123"));
        assert_eq!(patch.timeout_ms, Some(5000));
        assert_eq!(
            patch.theme.unwrap().primary_color.as_deref(),
            Some("#222222")
        );
        assert_eq!(patch.categories.unwrap().len(), 1);
    }
}
