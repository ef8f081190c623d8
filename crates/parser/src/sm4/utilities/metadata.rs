use crate::{
    sm4::structs::Page,
    types::{MetadataMap, StringKind},
};

/// Flatten one decoded page into string metadata, layered over the
/// file-level PRM map when one was decoded.
pub fn page_metadata(page: &Page, base: Option<&MetadataMap>) -> MetadataMap {
    let mut meta = base.cloned().unwrap_or_default();

    if let Some(s) = page.header.page_type.name() {
        meta.insert("Type".into(), s.into());
    }
    if let Some(s) = page.header.scan_dir.name() {
        meta.insert("Scan Direction".into(), s.into());
    }
    if let Some(s) = page.source.name() {
        meta.insert("Source".into(), s.into());
    }

    set_double(&mut meta, "Bias", page.header.bias, Some("V"));
    set_double(&mut meta, "Rotation angle", page.header.angle, Some("deg"));
    set_double(&mut meta, "Period", page.header.period, Some("s"));
    set_int(&mut meta, "X coordinate", page.header.x_coord as i64);
    set_int(&mut meta, "Y coordinate", page.header.y_coord as i64);
    set_int(&mut meta, "X size", page.header.x_size as i64);
    set_int(&mut meta, "Y size", page.header.y_size as i64);
    set_int(&mut meta, "Min Z value", page.header.min_z_value as i64);
    set_int(&mut meta, "Max Z value", page.header.max_z_value as i64);
    set_double(&mut meta, "X scale", page.header.x_scale, None);
    set_double(&mut meta, "Y scale", page.header.y_scale, None);
    set_double(&mut meta, "Z scale", page.header.z_scale, None);
    set_double(&mut meta, "XY scale", page.header.xy_scale, None);
    set_double(&mut meta, "X offset", page.header.x_offset, None);
    set_double(&mut meta, "Y offset", page.header.y_offset, None);
    set_double(&mut meta, "Z offset", page.header.z_offset, None);
    set_double(&mut meta, "Current", page.header.current, Some("A"));
    set_int(&mut meta, "Color Info Count", page.header.color_info_count as i64);
    set_int(&mut meta, "Grid X size", page.header.grid_x_size as i64);
    set_int(&mut meta, "Grid Y size", page.header.grid_y_size as i64);
    set_int(&mut meta, "Line type", page.header.line_type.raw() as i64);
    set_int(&mut meta, "Image type", page.header.image_type.raw() as i64);

    if let Some(date) = page.strings.get(StringKind::Date).filter(|s| !s.is_empty()) {
        let time = page.strings.get(StringKind::Time).unwrap_or_default();
        meta.insert("Date".into(), format!("{date} {time}").trim_end().into());
    }

    set_string(&mut meta, page, StringKind::Label, "Label");
    set_string(&mut meta, page, StringKind::Path, "Path");
    set_string(&mut meta, page, StringKind::SystemText, "System comment");
    set_string(&mut meta, page, StringKind::SessionText, "Session comment");
    set_string(&mut meta, page, StringKind::UserText, "User comment");
    set_string(&mut meta, page, StringKind::XUnits, "X units");
    set_string(&mut meta, page, StringKind::YUnits, "Y units");
    set_string(&mut meta, page, StringKind::ZUnits, "Z units");
    set_string(&mut meta, page, StringKind::XLabel, "X label");
    set_string(&mut meta, page, StringKind::YLabel, "Y label");
    set_string(&mut meta, page, StringKind::StatusChannelText, "Status channel text");
    set_string(&mut meta, page, StringKind::CompletedLineCount, "Completed line count");
    set_string(&mut meta, page, StringKind::OversamplingCount, "Oversampling count");
    set_string(&mut meta, page, StringKind::SlicedVoltage, "Sliced voltage");

    add_pll_pro_status(page, &mut meta);

    meta.insert("Page ID".into(), hex_bytes(&page.id));
    meta.insert("Group ID".into(), format!("{:08x}", page.header.group_id));

    meta
}

/// The PLL Pro status slot holds its own `name : value` report, with
/// blank-line-delimited group prefixes; flatten it under
/// `PLLPro status::`.
fn add_pll_pro_status(page: &Page, meta: &mut MetadataMap) {
    let Some(status) = page.strings.get(StringKind::PllProStatus) else {
        return;
    };

    let mut second_prefix: Option<&str> = None;
    let mut looking_for_second_prefix = false;
    for line in status.lines() {
        let line = line.trim();
        if line.is_empty() {
            looking_for_second_prefix = true;
            second_prefix = None;
            continue;
        }
        if let Some((name, value)) = line.split_once(" : ") {
            let mut key = String::from("PLLPro status::");
            if let Some(prefix) = second_prefix {
                key.push_str(prefix);
                key.push_str("::");
            }
            key.push_str(name.trim());
            meta.insert(key, value.trim().to_string());
            looking_for_second_prefix = false;
        } else if looking_for_second_prefix {
            second_prefix = Some(line);
            looking_for_second_prefix = false;
        }
    }
}

fn set_double(meta: &mut MetadataMap, name: &str, value: f64, unit: Option<&str>) {
    let s = match unit {
        Some(unit) => format!("{value} {unit}"),
        None => format!("{value}"),
    };
    meta.insert(name.into(), s);
}

fn set_int(meta: &mut MetadataMap, name: &str, value: i64) {
    meta.insert(name.into(), value.to_string());
}

fn set_string(meta: &mut MetadataMap, page: &Page, kind: StringKind, name: &str) {
    if let Some(s) = page.strings.get(kind) {
        meta.insert(name.into(), s.into());
    }
}

fn hex_bytes(bytes: &[u8]) -> String {
    let mut s = String::with_capacity(2 * bytes.len());
    for b in bytes {
        s.push_str(&format!("{b:02x}"));
    }
    s
}
