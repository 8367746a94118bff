use crate::extraction::tags::{is_private, ORIGINAL_ATTRIBUTES_SEQUENCE};
use crate::rewrite::rules::rewrite_value;
use dicom_core::header::Header;
use dicom_core::value::{DataSetSequence, Value};
use dicom_core::{DataElement, Length, Tag};
use dicom_object::InMemDicomObject;

/// Counters gathered while walking a tree
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalkStats {
    /// Attributes whose value was replaced
    pub rewritten: usize,
    /// Private attributes removed
    pub private_removed: usize,
    /// Sequence items visited
    pub items_visited: usize,
}

impl WalkStats {
    fn merge(&mut self, other: WalkStats) {
        self.rewritten += other.rewritten;
        self.private_removed += other.private_removed;
        self.items_visited += other.items_visited;
    }
}

/// Removes the Original Attributes Sequence from the top level
///
/// Returns true if the sequence was present.
pub fn remove_provenance(dcm: &mut InMemDicomObject) -> bool {
    dcm.remove_element(ORIGINAL_ATTRIBUTES_SEQUENCE)
}

/// Removes every private attribute, descending into sequence items
pub fn remove_private_tags(dcm: &mut InMemDicomObject) -> usize {
    let mut removed = 0;
    for tag in collect_tags(dcm) {
        if is_private(tag) {
            if dcm.remove_element(tag) {
                removed += 1;
            }
            continue;
        }
        removed += map_sequence_items(dcm, tag, &mut |item| remove_private_tags(item));
    }
    removed
}

/// Applies the rewrite rules to every attribute, depth first
///
/// Each attribute is evaluated once against its original tag and VR.
/// Sequence attributes are not rewritten themselves, their items are.
pub fn rewrite_tree(dcm: &mut InMemDicomObject) -> WalkStats {
    let mut stats = WalkStats::default();

    for tag in collect_tags(dcm) {
        let replacement = match dcm.element(tag) {
            Ok(elem) => match elem.value() {
                Value::Primitive(value) => rewrite_value(tag, elem.vr(), value)
                    .map(|new_value| DataElement::new(tag, elem.vr(), new_value)),
                Value::Sequence(_) => None,
                Value::PixelSequence(_) => None,
            },
            Err(_) => None,
        };

        if let Some(new_elem) = replacement {
            dcm.put(new_elem);
            stats.rewritten += 1;
            continue;
        }

        let mut nested = WalkStats::default();
        let items = map_sequence_items(dcm, tag, &mut |item| {
            nested.merge(rewrite_tree(item));
            1
        });
        nested.items_visited += items;
        stats.merge(nested);
    }

    stats
}

fn collect_tags(dcm: &InMemDicomObject) -> Vec<Tag> {
    dcm.iter().map(|elem| elem.tag()).collect()
}

/// Runs `f` on each item of the sequence at `tag` and puts the sequence back
///
/// Sums the values returned by `f`. Non-sequence attributes are left
/// untouched and yield zero. The rebuilt sequence has undefined length
/// because item contents may have shrunk.
fn map_sequence_items<F>(dcm: &mut InMemDicomObject, tag: Tag, f: &mut F) -> usize
where
    F: FnMut(&mut InMemDicomObject) -> usize,
{
    let is_sequence = matches!(
        dcm.element(tag).map(|elem| elem.value()),
        Ok(Value::Sequence(_))
    );
    if !is_sequence {
        return 0;
    }

    let elem = match dcm.take_element(tag) {
        Ok(elem) => elem,
        Err(_) => return 0,
    };
    let vr = elem.vr();
    let mut items = elem.into_value().into_items().unwrap_or_default();

    let total: usize = items.iter_mut().map(|item| f(item)).sum();

    dcm.put(DataElement::new(
        tag,
        vr,
        DataSetSequence::new(items, Length::UNDEFINED),
    ));
    total
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::tags::{
        get_string_value, ACQUISITION_TIME, PATIENT_ID, REGION_LOCATION_MIN_Y0,
        SEQUENCE_OF_ULTRASOUND_REGIONS, STUDY_DATE, STUDY_INSTANCE_UID,
    };
    use dicom_core::{PrimitiveValue, VR};

    fn nested_dicom() -> InMemDicomObject {
        let mut item = InMemDicomObject::new_empty();
        item.put(DataElement::new(
            STUDY_DATE,
            VR::DA,
            PrimitiveValue::from("20190704"),
        ));
        item.put(DataElement::new(
            Tag(0x0011, 0x1001),
            VR::LO,
            PrimitiveValue::from("vendor"),
        ));
        item.put(DataElement::new(
            REGION_LOCATION_MIN_Y0,
            VR::UL,
            PrimitiveValue::from(80_u32),
        ));

        let mut obj = InMemDicomObject::new_empty();
        obj.put(DataElement::new(
            PATIENT_ID,
            VR::LO,
            PrimitiveValue::from("123"),
        ));
        obj.put(DataElement::new(
            ACQUISITION_TIME,
            VR::TM,
            PrimitiveValue::from("101530.25"),
        ));
        obj.put(DataElement::new(
            SEQUENCE_OF_ULTRASOUND_REGIONS,
            VR::SQ,
            DataSetSequence::from(vec![item]),
        ));
        obj.put(DataElement::new(
            Tag(0x0009, 0x0010),
            VR::LO,
            PrimitiveValue::from("ACME"),
        ));
        obj
    }

    fn first_region(obj: &InMemDicomObject) -> &InMemDicomObject {
        &obj.element(SEQUENCE_OF_ULTRASOUND_REGIONS)
            .unwrap()
            .value()
            .items()
            .unwrap()[0]
    }

    #[test]
    fn test_rewrite_descends_into_sequences() {
        let mut obj = nested_dicom();
        let stats = rewrite_tree(&mut obj);

        assert_eq!(get_string_value(&obj, ACQUISITION_TIME).as_deref(), Some("000000"));
        assert_eq!(get_string_value(&obj, PATIENT_ID).as_deref(), Some("123"));
        let region = first_region(&obj);
        assert_eq!(get_string_value(region, STUDY_DATE).as_deref(), Some("20190101"));
        assert_eq!(stats.items_visited, 1);
        // private creator, nested date, acquisition time
        assert_eq!(stats.rewritten, 3);
    }

    #[test]
    fn test_remove_private_tags_recursively() {
        let mut obj = nested_dicom();
        let removed = remove_private_tags(&mut obj);

        assert_eq!(removed, 2);
        assert!(obj.element(Tag(0x0009, 0x0010)).is_err());
        let region = first_region(&obj);
        assert!(region.element(Tag(0x0011, 0x1001)).is_err());
        assert!(region.element(REGION_LOCATION_MIN_Y0).is_ok());
    }

    #[test]
    fn test_remove_provenance() {
        let mut obj = nested_dicom();
        assert!(!remove_provenance(&mut obj));

        obj.put(DataElement::new(
            ORIGINAL_ATTRIBUTES_SEQUENCE,
            VR::SQ,
            DataSetSequence::from(vec![InMemDicomObject::new_empty()]),
        ));
        assert!(remove_provenance(&mut obj));
        assert!(obj.element(ORIGINAL_ATTRIBUTES_SEQUENCE).is_err());
    }

    #[test]
    fn test_uid_replaced_at_any_depth() {
        let mut item = InMemDicomObject::new_empty();
        item.put(DataElement::new(
            STUDY_INSTANCE_UID,
            VR::UI,
            PrimitiveValue::from("1.2.3.4"),
        ));
        let mut obj = InMemDicomObject::new_empty();
        obj.put(DataElement::new(
            Tag(0x0008, 0x1115),
            VR::SQ,
            DataSetSequence::from(vec![item]),
        ));

        rewrite_tree(&mut obj);

        let item = &obj.element(Tag(0x0008, 0x1115)).unwrap().value().items().unwrap()[0];
        let uid = get_string_value(item, STUDY_INSTANCE_UID).unwrap();
        assert_ne!(uid, "1.2.3.4");
        assert!(uid.starts_with("2.25."));
    }
}
