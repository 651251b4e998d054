//! Injection of the sidebar into a site configuration document.
//!
//! The site document follows the site generator's shape:
//!
//! ```json
//! {
//!   "themeConfig": { "sidebar": { ... } },
//!   "locales": { "root": { "lang": "en", "themeConfig": { "sidebar": { ... } } } }
//! }
//! ```

use serde_json::{Map, Value};

use crate::error::BuildError;
use crate::item::SidebarMulti;
use crate::locale::LocaleGrouper;
use crate::options::BuildOptions;

/// Build the sidebar and write it into `site`.
///
/// If `site.locales` is a non-empty object, every locale must carry a
/// non-empty `lang`; the map built under `<root>/<lang>` goes to
/// `locales.<key>.themeConfig.sidebar`. Otherwise one map goes to
/// `themeConfig.sidebar`. Missing `themeConfig` objects are created.
///
/// # Errors
///
/// Returns `BuildError::MissingLocaleLang` before any traversal if a locale
/// has no `lang`, `BuildError::InvalidSite` if the document has the wrong
/// shape, or any error from the tree build.
pub fn inject_sidebar(site: Value, options: &BuildOptions) -> Result<Value, BuildError> {
    let Value::Object(mut root) = site else {
        return Err(BuildError::InvalidSite(
            "expected a JSON object".to_owned(),
        ));
    };

    let langs = locale_langs(root.get("locales"))?;
    let grouper = LocaleGrouper::new(options);

    if langs.is_empty() {
        let sidebar = to_value(&grouper.build_root()?)?;
        set_sidebar(&mut root, sidebar)?;
    } else {
        for (key, lang) in langs {
            let sidebar = to_value(&grouper.build_locale(&lang)?)?;
            let locale = root
                .get_mut("locales")
                .and_then(|locales| locales.get_mut(&key))
                .and_then(Value::as_object_mut)
                .ok_or_else(|| {
                    BuildError::InvalidSite(format!("locale `{key}` is not an object"))
                })?;
            set_sidebar(locale, sidebar)?;
        }
    }

    tracing::info!("injected sidebar data successfully");
    Ok(Value::Object(root))
}

/// Collect `(key, lang)` pairs, failing on any locale without a language tag.
fn locale_langs(locales: Option<&Value>) -> Result<Vec<(String, String)>, BuildError> {
    let locales = match locales {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Object(locales)) => locales,
        Some(_) => {
            return Err(BuildError::InvalidSite(
                "`locales` must be an object".to_owned(),
            ));
        }
    };

    locales
        .iter()
        .map(|(key, locale)| {
            locale
                .get("lang")
                .and_then(Value::as_str)
                .filter(|lang| !lang.is_empty())
                .map(|lang| (key.clone(), lang.to_owned()))
                .ok_or_else(|| BuildError::MissingLocaleLang(key.clone()))
        })
        .collect()
}

fn to_value(sidebar: &SidebarMulti) -> Result<Value, BuildError> {
    serde_json::to_value(sidebar)
        .map_err(|e| BuildError::InvalidSite(format!("cannot serialize sidebar: {e}")))
}

fn set_sidebar(target: &mut Map<String, Value>, sidebar: Value) -> Result<(), BuildError> {
    let theme = target
        .entry("themeConfig")
        .or_insert_with(|| Value::Object(Map::new()));
    if theme.is_null() {
        *theme = Value::Object(Map::new());
    }
    let Value::Object(theme) = theme else {
        return Err(BuildError::InvalidSite(
            "`themeConfig` must be an object".to_owned(),
        ));
    };
    theme.insert("sidebar".to_owned(), sidebar);
    Ok(())
}
