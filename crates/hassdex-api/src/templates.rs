// Template-backed registry queries
//
// The hub's REST API does not expose the area and device registries, so
// they are read by rendering Jinja templates via `POST /api/template`.
// Templates answer in plain text (newline- or comma-joined lists,
// `id|name` pairs) which is parsed here before anything leaves the crate.

use tracing::{debug, warn};

use crate::client::HubClient;
use crate::error::Error;
use crate::models::{AreaRef, DeviceInfoLookup};

/// Every area as one `area_id|name` line. Ids are slugs; names may hold `|`.
const AREAS_TEMPLATE: &str =
    "{% for area in areas() %}{{ area }}|{{ area_name(area) }}\n{% endfor %}";

/// Device ids referenced by any entity, deduplicated in discovery order.
const DEVICE_IDS_TEMPLATE: &str = "{% set devices = namespace(ids=[]) %}\
{% for state in states %}{% set did = device_id(state.entity_id) %}\
{% if did and did not in devices.ids %}{% set devices.ids = devices.ids + [did] %}{% endif %}\
{% endfor %}{% for did in devices.ids %}{{ did }}\n{% endfor %}";

impl HubClient {
    /// List areas in registry order.
    pub async fn list_areas(&self) -> Result<Vec<AreaRef>, Error> {
        debug!("listing areas");
        let raw = self.render_template(AREAS_TEMPLATE).await?;
        Ok(parse_area_lines(&raw))
    }

    /// Entity ids assigned to an area.
    pub async fn area_entities(&self, area_id: &str) -> Result<Vec<String>, Error> {
        debug!(area_id, "listing area entities");
        let raw = self
            .render_template(&joined_call("area_entities", area_id))
            .await?;
        Ok(parse_joined(&raw))
    }

    /// Device ids referenced by any entity.
    pub async fn device_ids(&self) -> Result<Vec<String>, Error> {
        debug!("listing device ids");
        let raw = self.render_template(DEVICE_IDS_TEMPLATE).await?;
        Ok(parse_lines(&raw))
    }

    /// Descriptive attributes of one device.
    ///
    /// Never fails: a body that does not decode, or a failed request, comes
    /// back as [`DeviceInfoLookup::Malformed`].
    pub async fn device_info(&self, device_id: &str) -> DeviceInfoLookup {
        match self.render_template(&device_info_template(device_id)).await {
            Ok(raw) => DeviceInfoLookup::from_rendered(device_id, &raw),
            Err(e) => {
                warn!(device_id, error = %e, "device info lookup failed");
                DeviceInfoLookup::Malformed {
                    device_id: device_id.to_owned(),
                    raw: e.to_string(),
                }
            }
        }
    }

    /// Entity ids owned by a device.
    pub async fn device_entities(&self, device_id: &str) -> Result<Vec<String>, Error> {
        debug!(device_id, "listing device entities");
        let raw = self
            .render_template(&joined_call("device_entities", device_id))
            .await?;
        Ok(parse_joined(&raw))
    }
}

// ── Template builders ───────────────────────────────────────────────

/// Escape a value for use inside a single-quoted Jinja string literal.
pub fn quote(value: &str) -> String {
    let escaped = value.replace('\\', "\\\\").replace('\'', "\\'");
    format!("'{escaped}'")
}

/// `{{ func('arg') | join(',') }}`
fn joined_call(func: &str, arg: &str) -> String {
    format!("{{{{ {func}({}) | join(',') }}}}", quote(arg))
}

/// A template rendering one JSON object describing the device.
pub fn device_info_template(device_id: &str) -> String {
    let id = quote(device_id);
    format!(
        "{{% set area = device_attr({id}, 'area_id') %}}{{\n  \
         \"id\": {{{{ {id} | to_json }}}},\n  \
         \"name\": {{{{ device_attr({id}, 'name') | default('unknown', true) | to_json }}}},\n  \
         \"manufacturer\": {{{{ device_attr({id}, 'manufacturer') | default('', true) | to_json }}}},\n  \
         \"model\": {{{{ device_attr({id}, 'model') | default('', true) | to_json }}}},\n  \
         \"area_id\": {{{{ area | default('', true) | to_json }}}},\n  \
         \"area_name\": {{{{ (area_name(area) if area else '') | default('', true) | to_json }}}}\n}}"
    )
}

// ── Response parsers ────────────────────────────────────────────────

/// Parse newline-joined identifiers, dropping blanks and repeats.
pub fn parse_lines(raw: &str) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter(|line| seen.insert(*line))
        .map(str::to_owned)
        .collect()
}

/// Parse a comma-joined list. A blank response is an empty list.
pub fn parse_joined(raw: &str) -> Vec<String> {
    raw.trim()
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Parse `area_id|name` lines. Lines without a `|` are skipped; only the
/// first `|` separates, so the rest of the line is the name verbatim.
pub fn parse_area_lines(raw: &str) -> Vec<AreaRef> {
    raw.trim()
        .lines()
        .filter_map(|line| line.split_once('|'))
        .map(|(id, name)| AreaRef {
            id: id.trim().to_owned(),
            name: name.trim().to_owned(),
        })
        .filter(|area| !area.id.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quote_escapes_quotes_and_backslashes() {
        assert_eq!(quote("abc"), "'abc'");
        assert_eq!(quote("it's"), "'it\\'s'");
        assert_eq!(quote("a\\b"), "'a\\\\b'");
    }

    #[test]
    fn joined_call_renders_filter() {
        assert_eq!(
            joined_call("area_entities", "kitchen"),
            "{{ area_entities('kitchen') | join(',') }}"
        );
    }

    #[test]
    fn device_info_template_mentions_every_field() {
        let template = device_info_template("abc123");
        for field in ["\"id\"", "\"name\"", "\"manufacturer\"", "\"model\"", "\"area_id\"", "\"area_name\""] {
            assert!(template.contains(field), "missing {field} in {template}");
        }
        assert!(template.contains("device_attr('abc123', 'name')"));
        assert!(template.starts_with("{% set area = device_attr('abc123', 'area_id') %}{"));
    }

    #[test]
    fn parse_lines_dedups_in_order() {
        assert_eq!(parse_lines("b\na\n\n b \na\n"), vec!["b", "a"]);
        assert!(parse_lines("").is_empty());
        assert!(parse_lines("\n\n").is_empty());
    }

    #[test]
    fn parse_joined_handles_blank_and_padding() {
        assert!(parse_joined("").is_empty());
        assert!(parse_joined("   \n").is_empty());
        assert_eq!(
            parse_joined("light.a, sensor.b,\n"),
            vec!["light.a", "sensor.b"]
        );
    }

    #[test]
    fn parse_area_lines_splits_on_first_pipe() {
        let areas = parse_area_lines("living_room|Living Room\nnot an area\n|Nameless\n");
        assert_eq!(
            areas,
            vec![AreaRef {
                id: "living_room".into(),
                name: "Living Room".into(),
            }]
        );
    }

    #[test]
    fn area_names_may_contain_pipes() {
        let areas = parse_area_lines("office|Office | Studio\ngarage|Garage\n");
        assert_eq!(areas[0].id, "office");
        assert_eq!(areas[0].name, "Office | Studio");
        assert_eq!(areas[1].id, "garage");
    }

    #[test]
    fn areas_template_puts_id_first() {
        assert!(AREAS_TEMPLATE.contains("{{ area }}|{{ area_name(area) }}"));
    }
}
