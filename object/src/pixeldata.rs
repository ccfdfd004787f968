//! Pixel data access for DICOM files,
//! so that pixel data codecs can read and replace it.
use crate::{FileDicomObject, InMemDicomObject};
use dcmcodec_core::value::{PixelFragmentSequence, C};
use dcmcodec_core::{dicom_value, DataDictionary, DataElement, DicomValue, PrimitiveValue, Tag, VR};
use dcmcodec_dictionary_std::tags;
use dcmcodec_encoding::adapters::{PixelDataObject, PixelDataObjectMut, RawPixelData};

impl<D> FileDicomObject<InMemDicomObject<D>>
where
    D: DataDictionary + Clone,
{
    fn attribute_u16(&self, tag: Tag) -> Option<u16> {
        self.element_opt(tag).ok()??.to_int().ok()
    }
}

impl<D> PixelDataObject for FileDicomObject<InMemDicomObject<D>>
where
    D: DataDictionary + Clone,
{
    fn transfer_syntax_uid(&self) -> &str {
        self.meta().transfer_syntax()
    }

    fn rows(&self) -> Option<u16> {
        self.attribute_u16(tags::ROWS)
    }

    fn cols(&self) -> Option<u16> {
        self.attribute_u16(tags::COLUMNS)
    }

    fn samples_per_pixel(&self) -> Option<u16> {
        self.attribute_u16(tags::SAMPLES_PER_PIXEL)
    }

    fn bits_allocated(&self) -> Option<u16> {
        self.attribute_u16(tags::BITS_ALLOCATED)
    }

    fn number_of_frames(&self) -> Option<u32> {
        self.element_opt(tags::NUMBER_OF_FRAMES).ok()??.to_int().ok()
    }

    fn planar_configuration(&self) -> Option<u16> {
        self.attribute_u16(tags::PLANAR_CONFIGURATION)
    }

    /// Native pixel data is given as a single buffer.
    /// Encapsulated pixel data which could only be kept as raw bytes
    /// is given as a single fragment.
    fn raw_pixel_data(&self) -> Option<RawPixelData> {
        let elem = self.element_opt(tags::PIXEL_DATA).ok()??;
        match elem.value() {
            DicomValue::Primitive(value) => Some(RawPixelData {
                fragments: C::from_elem(value.to_bytes().into_owned(), 1),
                offset_table: C::new(),
                encapsulated: elem.header().len.is_undefined(),
            }),
            DicomValue::PixelSequence(seq) => Some(RawPixelData {
                fragments: seq.fragments().iter().cloned().collect(),
                offset_table: seq.offset_table().into(),
                encapsulated: true,
            }),
            DicomValue::Sequence(_) => None,
        }
    }
}

impl<D> PixelDataObjectMut for FileDicomObject<InMemDicomObject<D>>
where
    D: DataDictionary + Clone,
{
    fn set_native_pixel_data(&mut self, data: Vec<u8>, vr: VR) {
        self.put(DataElement::new(
            tags::PIXEL_DATA,
            vr,
            PrimitiveValue::from(data),
        ));
    }

    fn set_encapsulated_pixel_data(&mut self, offset_table: C<u32>, fragments: C<Vec<u8>>) {
        self.put(DataElement::new(
            tags::PIXEL_DATA,
            VR::OB,
            PixelFragmentSequence::new(offset_table, fragments),
        ));
    }

    fn set_transfer_syntax(&mut self, uid: &str) {
        self.meta_mut().set_transfer_syntax(uid);
    }

    fn set_planar_configuration(&mut self, value: u16) {
        self.put(DataElement::new(
            tags::PLANAR_CONFIGURATION,
            VR::US,
            dicom_value!(U16, [value]),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FileMetaTableBuilder;
    use dcmcodec_dictionary_std::uids;

    fn image() -> FileDicomObject<InMemDicomObject> {
        let mut obj = InMemDicomObject::new_empty();
        obj.put_str("Rows", "2").unwrap();
        obj.put_str("Columns", "3").unwrap();
        obj.put_str("SamplesPerPixel", "1").unwrap();
        obj.put_str("BitsAllocated", "8").unwrap();
        obj.put_str("NumberOfFrames", "1").unwrap();
        obj.put_str("SOPInstanceUID", "2.25.99").unwrap();
        obj.put(DataElement::new(
            tags::PIXEL_DATA,
            VR::OB,
            PrimitiveValue::from(vec![1_u8, 2, 3, 4, 5, 6]),
        ));
        obj.with_meta(
            FileMetaTableBuilder::new()
                .transfer_syntax(uids::EXPLICIT_VR_LITTLE_ENDIAN)
                .media_storage_sop_class_uid(uids::SECONDARY_CAPTURE_IMAGE_STORAGE),
        )
        .unwrap()
    }

    #[test]
    fn read_image_attributes() {
        let obj = image();
        assert_eq!(obj.rows(), Some(2));
        assert_eq!(obj.cols(), Some(3));
        assert_eq!(obj.samples_per_pixel(), Some(1));
        assert_eq!(obj.bits_allocated(), Some(8));
        assert_eq!(obj.number_of_frames(), Some(1));
        assert_eq!(obj.planar_configuration(), None);

        let raw = obj.raw_pixel_data().unwrap();
        assert!(!raw.encapsulated);
        assert_eq!(raw.fragments.len(), 1);
        assert_eq!(raw.fragments[0], vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn replace_pixel_data() {
        let mut obj = image();
        obj.set_encapsulated_pixel_data(C::new(), C::from_elem(vec![0xAA; 4], 2));
        obj.set_transfer_syntax(uids::RLE_LOSSLESS);

        assert_eq!(obj.transfer_syntax_uid(), uids::RLE_LOSSLESS);
        let raw = obj.raw_pixel_data().unwrap();
        assert!(raw.encapsulated);
        assert_eq!(raw.fragments.len(), 2);
        assert!(raw.offset_table.is_empty());

        obj.set_native_pixel_data(vec![0; 6], VR::OB);
        obj.set_planar_configuration(1);
        assert!(!obj.raw_pixel_data().unwrap().encapsulated);
        assert_eq!(obj.planar_configuration(), Some(1));
    }
}
