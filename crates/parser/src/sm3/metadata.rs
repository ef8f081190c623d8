use crate::{
    sm3::structs::Sm3Page,
    types::{MetadataMap, StringKind},
};

/// Flatten an SM3 page into string metadata. SM3 has no PRM block, so
/// there is nothing to layer under.
pub fn page_metadata(page: &Sm3Page) -> MetadataMap {
    let mut meta = MetadataMap::new();

    if let Some(s) = page.page_type.name() {
        meta.insert("Type".into(), s.into());
    }
    if let Some(s) = page.scan_dir.name() {
        meta.insert("Scan Direction".into(), s.into());
    }
    if let Some(s) = page.source.name() {
        meta.insert("Source".into(), s.into());
    }

    meta.insert("Bias".into(), format!("{} V", page.bias));
    meta.insert("Rotation angle".into(), format!("{}", page.angle));
    meta.insert("Period".into(), format!("{} s", page.period));

    if let Some(date) = page.strings.get(StringKind::Date).filter(|s| !s.is_empty()) {
        let time = page.strings.get(StringKind::Time).unwrap_or_default();
        meta.insert("Date".into(), format!("{date} {time}").trim_end().into());
    }

    for (kind, name) in [
        (StringKind::Label, "Label"),
        (StringKind::Path, "Path"),
        (StringKind::SystemText, "System comment"),
        (StringKind::SessionText, "Session comment"),
        (StringKind::UserText, "User comment"),
    ] {
        if let Some(s) = page.strings.get(kind).filter(|s| !s.is_empty()) {
            meta.insert(name.into(), s.into());
        }
    }

    let mut id = String::with_capacity(32);
    for b in &page.page_id {
        id.push_str(&format!("{b:02x}"));
    }
    meta.insert("Page ID".into(), id);

    meta
}
