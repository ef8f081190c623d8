pub mod metadata;
pub mod read_drift_header;
pub mod read_objects;
pub mod read_page_data;
pub mod read_page_header;
pub mod read_page_index;
pub mod read_page_index_header;
pub mod read_piezo_sensitivity;
pub mod read_prm;
pub mod read_spec_info;
pub mod read_string_data;

#[cfg(test)]
mod tests;
