use crate::error::{DeidError, Result};
use crate::extraction::tags::{
    get_string_value, IMPLEMENTATION_CLASS_UID, IMPLEMENTATION_VERSION_NAME,
    MEDIA_STORAGE_SOP_CLASS_UID, MEDIA_STORAGE_SOP_INSTANCE_UID, TRANSFER_SYNTAX_UID,
};
use crate::rewrite::walk::{rewrite_tree, WalkStats};
use dicom_core::{DataElement, PrimitiveValue, VR};
use dicom_object::{FileMetaTable, FileMetaTableBuilder, InMemDicomObject};

/// Exposes the file meta group as an attribute tree
///
/// Only the string attributes are carried over. The group length and
/// version are recomputed when the table is rebuilt.
pub fn meta_as_tree(meta: &FileMetaTable) -> InMemDicomObject {
    let mut tree = InMemDicomObject::new_empty();
    let uid_fields = [
        (MEDIA_STORAGE_SOP_CLASS_UID, &meta.media_storage_sop_class_uid),
        (
            MEDIA_STORAGE_SOP_INSTANCE_UID,
            &meta.media_storage_sop_instance_uid,
        ),
        (TRANSFER_SYNTAX_UID, &meta.transfer_syntax),
        (IMPLEMENTATION_CLASS_UID, &meta.implementation_class_uid),
    ];
    for (tag, value) in uid_fields {
        tree.put(DataElement::new(
            tag,
            VR::UI,
            PrimitiveValue::from(trim_padding(value)),
        ));
    }
    if let Some(name) = &meta.implementation_version_name {
        tree.put(DataElement::new(
            IMPLEMENTATION_VERSION_NAME,
            VR::SH,
            PrimitiveValue::from(trim_padding(name)),
        ));
    }
    tree
}

/// Starts a builder carrying every field of `meta` except the group length
pub fn meta_builder(meta: &FileMetaTable) -> FileMetaTableBuilder {
    let mut builder = FileMetaTableBuilder::new()
        .information_version(meta.information_version)
        .media_storage_sop_class_uid(trim_padding(&meta.media_storage_sop_class_uid))
        .media_storage_sop_instance_uid(trim_padding(&meta.media_storage_sop_instance_uid))
        .transfer_syntax(trim_padding(&meta.transfer_syntax))
        .implementation_class_uid(trim_padding(&meta.implementation_class_uid));

    if let Some(name) = &meta.implementation_version_name {
        builder = builder.implementation_version_name(trim_padding(name));
    }
    if let Some(ae) = &meta.source_application_entity_title {
        builder = builder.source_application_entity_title(ae.as_str());
    }
    if let Some(ae) = &meta.sending_application_entity_title {
        builder = builder.sending_application_entity_title(ae.as_str());
    }
    if let Some(ae) = &meta.receiving_application_entity_title {
        builder = builder.receiving_application_entity_title(ae.as_str());
    }
    if let Some(uid) = &meta.private_information_creator_uid {
        builder = builder.private_information_creator_uid(trim_padding(uid));
    }
    if let Some(info) = &meta.private_information {
        builder = builder.private_information(info.clone());
    }
    builder
}

/// Applies the rewrite rules to the file meta group
///
/// Walks the meta group as its own tree with the same rule as the main
/// dataset, then rebuilds the table so padding and group length match
/// the new values.
pub fn rewrite_file_meta(meta: &FileMetaTable) -> Result<(FileMetaTable, WalkStats)> {
    let mut tree = meta_as_tree(meta);
    let stats = rewrite_tree(&mut tree);

    let field = |tag| {
        get_string_value(&tree, tag)
            .ok_or_else(|| DeidError::TagNotFound(format!("{} in file meta", tag)))
    };

    let mut builder = meta_builder(meta)
        .media_storage_sop_instance_uid(field(MEDIA_STORAGE_SOP_INSTANCE_UID)?)
        .implementation_class_uid(field(IMPLEMENTATION_CLASS_UID)?);
    if let Some(name) = get_string_value(&tree, IMPLEMENTATION_VERSION_NAME) {
        builder = builder.implementation_version_name(name);
    }

    let table = builder
        .build()
        .map_err(|e| DeidError::DicomError(format!("{}", e)))?;
    Ok((table, stats))
}

fn trim_padding(value: &str) -> &str {
    value.trim_end_matches(|c: char| c == '\0' || c == ' ')
}
