use image::DynamicImage;
use std::io::Cursor;

/// Result of looking for an EXIF orientation tag in an uploaded photo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrientationReading {
    Tagged(u32),
    /// No EXIF block, or no orientation tag inside it.
    Untagged,
    /// EXIF was present but could not be read. Treated as identity.
    Unreadable(String),
}

/// Counterclockwise rotation needed to bring a photo upright.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rotation {
    Identity,
    Ccw90,
    Ccw180,
    Ccw270,
}

impl Rotation {
    pub fn for_code(code: u32) -> Self {
        match code {
            3 => Self::Ccw180,
            6 => Self::Ccw270,
            8 => Self::Ccw90,
            _ => Self::Identity,
        }
    }

    pub fn for_reading(reading: &OrientationReading) -> Self {
        match reading {
            OrientationReading::Tagged(code) => Self::for_code(*code),
            OrientationReading::Untagged | OrientationReading::Unreadable(_) => Self::Identity,
        }
    }

    pub fn degrees(self) -> u16 {
        match self {
            Self::Identity => 0,
            Self::Ccw90 => 90,
            Self::Ccw180 => 180,
            Self::Ccw270 => 270,
        }
    }

    /// `image` rotates clockwise, so the counterclockwise quarter turns swap.
    pub fn apply(self, img: DynamicImage) -> DynamicImage {
        match self {
            Self::Identity => img,
            Self::Ccw90 => img.rotate270(),
            Self::Ccw180 => img.rotate180(),
            Self::Ccw270 => img.rotate90(),
        }
    }
}

pub fn read_orientation(bytes: &[u8]) -> OrientationReading {
    let mut cursor = Cursor::new(bytes);
    let exif = match exif::Reader::new().read_from_container(&mut cursor) {
        Ok(exif) => exif,
        Err(exif::Error::NotFound(_)) => return OrientationReading::Untagged,
        Err(e) => return OrientationReading::Unreadable(e.to_string()),
    };

    match exif.get_field(exif::Tag::Orientation, exif::In::PRIMARY) {
        Some(field) => match field.value.get_uint(0) {
            Some(code) => OrientationReading::Tagged(code),
            None => OrientationReading::Unreadable(format!(
                "orientation tag has unexpected value {:?}",
                field.value
            )),
        },
        None => OrientationReading::Untagged,
    }
}
