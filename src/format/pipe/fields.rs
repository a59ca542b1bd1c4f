//! NMRPipe header field table.
//!
//! The 2048-byte NMRPipe header is an array of 512 32-bit words. Each named
//! field lives at a fixed word offset and is decoded either as a raw integer,
//! as a bit-reinterpreted IEEE-754 float, or as a run of words holding packed
//! ASCII text. This table is the only place offsets are written down; every
//! accessor elsewhere goes through [`PipeField`].
//!
//! Per-axis fields come in four physical slots (F1..F4). Which slot belongs to
//! which logical axis is decided by the dimension-order fields at runtime, see
//! [`AxisFields::for_slot`].

/// Number of 32-bit words in the header.
pub const HEADER_WORDS: usize = 512;

/// Size of the header in bytes.
pub const HEADER_SIZE: usize = HEADER_WORDS * 4;

/// Expected value of [`PipeField::FltOrder`] in the writer's byte order.
pub const BYTE_ORDER_SENTINEL: f32 = 2.345;

/// Maximum distance from [`BYTE_ORDER_SENTINEL`] still read as native order.
pub const BYTE_ORDER_TOLERANCE: f32 = 1e-6;

/// How the words of a field are decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Raw 32-bit integer
    Int,
    /// IEEE-754 float stored in the word's bits
    Float,
    /// Packed ASCII spanning `words` consecutive words
    Text { words: usize },
}

impl FieldKind {
    /// Number of header words the field occupies.
    pub const fn words(self) -> usize {
        match self {
            FieldKind::Int | FieldKind::Float => 1,
            FieldKind::Text { words } => words,
        }
    }
}

const INT: FieldKind = FieldKind::Int;
const FLOAT: FieldKind = FieldKind::Float;

const fn text(words: usize) -> FieldKind {
    FieldKind::Text { words }
}

macro_rules! pipe_fields {
    ($( $(#[$meta:meta])* $variant:ident => $offset:literal, $name:literal, $kind:expr; )*) => {
        /// Named NMRPipe header fields.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum PipeField {
            $( $(#[$meta])* $variant, )*
        }

        impl PipeField {
            /// Every known field, in offset order.
            pub const ALL: &'static [PipeField] = &[$( PipeField::$variant, )*];

            /// Word offset of the field inside the header.
            pub const fn offset(self) -> usize {
                match self {
                    $( PipeField::$variant => $offset, )*
                }
            }

            /// How the field's words are decoded.
            pub const fn kind(self) -> FieldKind {
                match self {
                    $( PipeField::$variant => $kind, )*
                }
            }

            /// Canonical NMRPipe name (e.g. `FDSIZE`).
            pub const fn name(self) -> &'static str {
                match self {
                    $( PipeField::$variant => $name, )*
                }
            }
        }
    };
}

pipe_fields! {
    /// Always zero in a valid file
    Magic => 0, "FDMAGIC", INT;
    FltFormat => 1, "FDFLTFORMAT", FLOAT;
    /// Byte-order sentinel, 2.345 in the writer's native order
    FltOrder => 2, "FDFLTORDER", FLOAT;
    /// Number of dimensions in the complete spectrum
    DimCount => 9, "FDDIMCOUNT", FLOAT;
    F3Obs => 10, "FDF3OBS", FLOAT;
    F3Sw => 11, "FDF3SW", FLOAT;
    F3Orig => 12, "FDF3ORIG", FLOAT;
    F3FtFlag => 13, "FDF3FTFLAG", FLOAT;
    PlaneLoc => 14, "FDPLANELOC", FLOAT;
    F3Size => 15, "FDF3SIZE", FLOAT;
    F2Label => 16, "FDF2LABEL", text(2);
    F1Label => 18, "FDF1LABEL", text(2);
    F3Label => 20, "FDF3LABEL", text(2);
    F4Label => 22, "FDF4LABEL", text(2);
    /// Physical slot (1-4) holding the fields of logical axis 1
    DimOrder1 => 24, "FDDIMORDER1", FLOAT;
    DimOrder2 => 25, "FDDIMORDER2", FLOAT;
    DimOrder3 => 26, "FDDIMORDER3", FLOAT;
    DimOrder4 => 27, "FDDIMORDER4", FLOAT;
    F4Obs => 28, "FDF4OBS", FLOAT;
    F4Sw => 29, "FDF4SW", FLOAT;
    F4Orig => 30, "FDF4ORIG", FLOAT;
    F4FtFlag => 31, "FDF4FTFLAG", FLOAT;
    F4Size => 32, "FDF4SIZE", FLOAT;
    DmxVal => 40, "FDDMXVAL", FLOAT;
    DmxFlag => 41, "FDDMXFLAG", FLOAT;
    DeltaTr => 42, "FDDELTATR", FLOAT;
    NusDim => 45, "FDNUSDIM", FLOAT;
    F3Apod => 50, "FDF3APOD", FLOAT;
    F3QuadFlag => 51, "FDF3QUADFLAG", FLOAT;
    F4Apod => 53, "FDF4APOD", FLOAT;
    F4QuadFlag => 54, "FDF4QUADFLAG", FLOAT;
    F1QuadFlag => 55, "FDF1QUADFLAG", FLOAT;
    F2QuadFlag => 56, "FDF2QUADFLAG", FLOAT;
    /// Non-zero when the file holds a full 3-D or 4-D stream
    PipeFlag => 57, "FDPIPEFLAG", FLOAT;
    F3Units => 58, "FDF3UNITS", FLOAT;
    F4Units => 59, "FDF4UNITS", FLOAT;
    F3P0 => 60, "FDF3P0", FLOAT;
    F3P1 => 61, "FDF3P1", FLOAT;
    F4P0 => 62, "FDF4P0", FLOAT;
    F4P1 => 63, "FDF4P1", FLOAT;
    F2AqSign => 64, "FDF2AQSIGN", FLOAT;
    Partition => 65, "FDPARTITION", FLOAT;
    F2Car => 66, "FDF2CAR", FLOAT;
    F1Car => 67, "FDF1CAR", FLOAT;
    F3Car => 68, "FDF3CAR", FLOAT;
    F4Car => 69, "FDF4CAR", FLOAT;
    User1 => 70, "FDUSER1", FLOAT;
    User2 => 71, "FDUSER2", FLOAT;
    User3 => 72, "FDUSER3", FLOAT;
    User4 => 73, "FDUSER4", FLOAT;
    User5 => 74, "FDUSER5", FLOAT;
    PipeCount => 75, "FDPIPECOUNT", FLOAT;
    User6 => 76, "FDUSER6", FLOAT;
    FirstPlane => 77, "FDFIRSTPLANE", FLOAT;
    LastPlane => 78, "FDLASTPLANE", FLOAT;
    F2Center => 79, "FDF2CENTER", FLOAT;
    F1Center => 80, "FDF1CENTER", FLOAT;
    F3Center => 81, "FDF3CENTER", FLOAT;
    F4Center => 82, "FDF4CENTER", FLOAT;
    F2Apod => 95, "FDF2APOD", FLOAT;
    F2FtSize => 96, "FDF2FTSIZE", FLOAT;
    RealSize => 97, "FDREALSIZE", FLOAT;
    F1FtSize => 98, "FDF1FTSIZE", FLOAT;
    /// Number of points in the current (x) dimension
    Size => 99, "FDSIZE", FLOAT;
    F2Sw => 100, "FDF2SW", FLOAT;
    F2Orig => 101, "FDF2ORIG", FLOAT;
    /// 1 for real data, 0 for complex
    QuadFlag => 106, "FDQUADFLAG", FLOAT;
    F2Zf => 108, "FDF2ZF", FLOAT;
    F2P0 => 109, "FDF2P0", FLOAT;
    F2P1 => 110, "FDF2P1", FLOAT;
    F2Lb => 111, "FDF2LB", FLOAT;
    F2Obs => 119, "FDF2OBS", FLOAT;
    McFlag => 135, "FDMCFLAG", FLOAT;
    F2Units => 152, "FDF2UNITS", FLOAT;
    Noise => 153, "FDNOISE", FLOAT;
    Temperature => 157, "FDTEMPERATURE", FLOAT;
    Pressure => 158, "FDPRESSURE", FLOAT;
    Rank => 180, "FDRANK", FLOAT;
    Tau => 199, "FDTAU", FLOAT;
    F3FtSize => 200, "FDF3FTSIZE", FLOAT;
    F4FtSize => 201, "FDF4FTSIZE", FLOAT;
    F1Obs => 218, "FDF1OBS", FLOAT;
    /// Number of 1-D spectra (y extent)
    SpecNum => 219, "FDSPECNUM", FLOAT;
    F2FtFlag => 220, "FDF2FTFLAG", FLOAT;
    /// 1 if the x and y axes have been transposed
    Transposed => 221, "FDTRANSPOSED", FLOAT;
    F1FtFlag => 222, "FDF1FTFLAG", FLOAT;
    F1Sw => 229, "FDF1SW", FLOAT;
    F1Units => 234, "FDF1UNITS", FLOAT;
    F1Lb => 243, "FDF1LB", FLOAT;
    F1P0 => 245, "FDF1P0", FLOAT;
    F1P1 => 246, "FDF1P1", FLOAT;
    Max => 247, "FDMAX", FLOAT;
    Min => 248, "FDMIN", FLOAT;
    F1Orig => 249, "FDF1ORIG", FLOAT;
    ScaleFlag => 250, "FDSCALEFLAG", FLOAT;
    DispMax => 251, "FDDISPMAX", FLOAT;
    DispMin => 252, "FDDISPMIN", FLOAT;
    PThresh => 253, "FDPTHRESH", FLOAT;
    NThresh => 254, "FDNTHRESH", FLOAT;
    TwoDPhase => 256, "FD2DPHASE", FLOAT;
    F2X1 => 257, "FDF2X1", FLOAT;
    F2Xn => 258, "FDF2XN", FLOAT;
    F1X1 => 259, "FDF1X1", FLOAT;
    F1Xn => 260, "FDF1XN", FLOAT;
    F3X1 => 261, "FDF3X1", FLOAT;
    F3Xn => 262, "FDF3XN", FLOAT;
    F4X1 => 263, "FDF4X1", FLOAT;
    F4Xn => 264, "FDF4XN", FLOAT;
    DomInfo => 266, "FDDOMINFO", FLOAT;
    MethInfo => 267, "FDMETHINFO", FLOAT;
    Hours => 283, "FDHOURS", FLOAT;
    Mins => 284, "FDMINS", FLOAT;
    Secs => 285, "FDSECS", FLOAT;
    SrcName => 286, "FDSRCNAME", text(4);
    UserName => 290, "FDUSERNAME", text(4);
    Month => 294, "FDMONTH", FLOAT;
    Day => 295, "FDDAY", FLOAT;
    Year => 296, "FDYEAR", FLOAT;
    Title => 297, "FDTITLE", text(15);
    Comment => 312, "FDCOMMENT", text(40);
    LastBlock => 359, "FDLASTBLOCK", FLOAT;
    ContBlock => 360, "FDCONTBLOCK", FLOAT;
    BaseBlock => 361, "FDBASEBLOCK", FLOAT;
    PeakBlock => 362, "FDPEAKBLOCK", FLOAT;
    BmapBlock => 363, "FDBMAPBLOCK", FLOAT;
    HistBlock => 364, "FDHISTBLOCK", FLOAT;
    OneDBlock => 365, "FD1DBLOCK", FLOAT;
    Score => 370, "FDSCORE", FLOAT;
    Scans => 371, "FDSCANS", FLOAT;
    F3Lb => 372, "FDF3LB", FLOAT;
    F4Lb => 373, "FDF4LB", FLOAT;
    F2Gb => 374, "FDF2GB", FLOAT;
    F1Gb => 375, "FDF1GB", FLOAT;
    F3Gb => 376, "FDF3GB", FLOAT;
    F4Gb => 377, "FDF4GB", FLOAT;
    F2ObsMid => 378, "FDF2OBSMID", FLOAT;
    F1ObsMid => 379, "FDF1OBSMID", FLOAT;
    F3ObsMid => 380, "FDF3OBSMID", FLOAT;
    F4ObsMid => 381, "FDF4OBSMID", FLOAT;
    F2GOff => 382, "FDF2GOFF", FLOAT;
    F1GOff => 383, "FDF1GOFF", FLOAT;
    F3GOff => 384, "FDF3GOFF", FLOAT;
    F4GOff => 385, "FDF4GOFF", FLOAT;
    F2TdSize => 386, "FDF2TDSIZE", FLOAT;
    F1TdSize => 387, "FDF1TDSIZE", FLOAT;
    F3TdSize => 388, "FDF3TDSIZE", FLOAT;
    F4TdSize => 389, "FDF4TDSIZE", FLOAT;
    TwoDVirgin => 399, "FD2DVIRGIN", FLOAT;
    F3ApodCode => 400, "FDF3APODCODE", FLOAT;
    F3ApodQ1 => 401, "FDF3APODQ1", FLOAT;
    F3ApodQ2 => 402, "FDF3APODQ2", FLOAT;
    F3ApodQ3 => 403, "FDF3APODQ3", FLOAT;
    F3C1 => 404, "FDF3C1", FLOAT;
    F4ApodCode => 405, "FDF4APODCODE", FLOAT;
    F4ApodQ1 => 406, "FDF4APODQ1", FLOAT;
    F4ApodQ2 => 407, "FDF4APODQ2", FLOAT;
    F4ApodQ3 => 408, "FDF4APODQ3", FLOAT;
    F4C1 => 409, "FDF4C1", FLOAT;
    F2ApodCode => 413, "FDF2APODCODE", FLOAT;
    F1ApodCode => 414, "FDF1APODCODE", FLOAT;
    F2ApodQ1 => 415, "FDF2APODQ1", FLOAT;
    F2ApodQ2 => 416, "FDF2APODQ2", FLOAT;
    F2ApodQ3 => 417, "FDF2APODQ3", FLOAT;
    F2C1 => 418, "FDF2C1", FLOAT;
    F2ApodDf => 419, "FDF2APODDF", FLOAT;
    F1ApodQ1 => 420, "FDF1APODQ1", FLOAT;
    F1ApodQ2 => 421, "FDF1APODQ2", FLOAT;
    F1ApodQ3 => 422, "FDF1APODQ3", FLOAT;
    F1C1 => 423, "FDF1C1", FLOAT;
    F1Apod => 428, "FDF1APOD", FLOAT;
    F1Zf => 437, "FDF1ZF", FLOAT;
    F3Zf => 438, "FDF3ZF", FLOAT;
    F4Zf => 439, "FDF4ZF", FLOAT;
    FileCount => 442, "FDFILECOUNT", FLOAT;
    SliceCount0 => 443, "FDSLICECOUNT0", FLOAT;
    ThreadCount => 444, "FDTHREADCOUNT", FLOAT;
    ThreadId => 445, "FDTHREADID", FLOAT;
    SliceCount1 => 446, "FDSLICECOUNT1", FLOAT;
    CubeFlag => 447, "FDCUBEFLAG", FLOAT;
    OperName => 464, "FDOPERNAME", text(8);
    F1AqSign => 475, "FDF1AQSIGN", FLOAT;
    F3AqSign => 476, "FDF3AQSIGN", FLOAT;
    F4AqSign => 477, "FDF4AQSIGN", FLOAT;
    F2OffPpm => 480, "FDF2OFFPPM", FLOAT;
    F1OffPpm => 481, "FDF1OFFPPM", FLOAT;
    F3OffPpm => 482, "FDF3OFFPPM", FLOAT;
    F4OffPpm => 483, "FDF4OFFPPM", FLOAT;
}

impl PipeField {
    /// Look up the field starting at `offset`.
    pub fn from_offset(offset: usize) -> Option<Self> {
        Self::ALL.iter().copied().find(|f| f.offset() == offset)
    }

    /// Look up a field by its NMRPipe name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|f| f.name() == name)
    }
}

// =============================================================================
// Per-axis field slots
// =============================================================================

/// The fields describing one physical axis slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisFields {
    pub label: PipeField,
    pub obs: PipeField,
    pub sw: PipeField,
    pub orig: PipeField,
    pub units: PipeField,
    pub quad_flag: PipeField,
    pub ft_flag: PipeField,
    pub ft_size: PipeField,
    pub td_size: PipeField,
    pub car: PipeField,
    pub center: PipeField,
    pub off_ppm: PipeField,
    pub apod: PipeField,
    pub zf: PipeField,
    pub p0: PipeField,
    pub p1: PipeField,
}

const SLOTS: [AxisFields; 4] = [
    AxisFields {
        label: PipeField::F1Label,
        obs: PipeField::F1Obs,
        sw: PipeField::F1Sw,
        orig: PipeField::F1Orig,
        units: PipeField::F1Units,
        quad_flag: PipeField::F1QuadFlag,
        ft_flag: PipeField::F1FtFlag,
        ft_size: PipeField::F1FtSize,
        td_size: PipeField::F1TdSize,
        car: PipeField::F1Car,
        center: PipeField::F1Center,
        off_ppm: PipeField::F1OffPpm,
        apod: PipeField::F1Apod,
        zf: PipeField::F1Zf,
        p0: PipeField::F1P0,
        p1: PipeField::F1P1,
    },
    AxisFields {
        label: PipeField::F2Label,
        obs: PipeField::F2Obs,
        sw: PipeField::F2Sw,
        orig: PipeField::F2Orig,
        units: PipeField::F2Units,
        quad_flag: PipeField::F2QuadFlag,
        ft_flag: PipeField::F2FtFlag,
        ft_size: PipeField::F2FtSize,
        td_size: PipeField::F2TdSize,
        car: PipeField::F2Car,
        center: PipeField::F2Center,
        off_ppm: PipeField::F2OffPpm,
        apod: PipeField::F2Apod,
        zf: PipeField::F2Zf,
        p0: PipeField::F2P0,
        p1: PipeField::F2P1,
    },
    AxisFields {
        label: PipeField::F3Label,
        obs: PipeField::F3Obs,
        sw: PipeField::F3Sw,
        orig: PipeField::F3Orig,
        units: PipeField::F3Units,
        quad_flag: PipeField::F3QuadFlag,
        ft_flag: PipeField::F3FtFlag,
        ft_size: PipeField::F3FtSize,
        td_size: PipeField::F3TdSize,
        car: PipeField::F3Car,
        center: PipeField::F3Center,
        off_ppm: PipeField::F3OffPpm,
        apod: PipeField::F3Apod,
        zf: PipeField::F3Zf,
        p0: PipeField::F3P0,
        p1: PipeField::F3P1,
    },
    AxisFields {
        label: PipeField::F4Label,
        obs: PipeField::F4Obs,
        sw: PipeField::F4Sw,
        orig: PipeField::F4Orig,
        units: PipeField::F4Units,
        quad_flag: PipeField::F4QuadFlag,
        ft_flag: PipeField::F4FtFlag,
        ft_size: PipeField::F4FtSize,
        td_size: PipeField::F4TdSize,
        car: PipeField::F4Car,
        center: PipeField::F4Center,
        off_ppm: PipeField::F4OffPpm,
        apod: PipeField::F4Apod,
        zf: PipeField::F4Zf,
        p0: PipeField::F4P0,
        p1: PipeField::F4P1,
    },
];

/// Dimension-order fields, indexed by logical axis - 1.
pub const DIM_ORDER_FIELDS: [PipeField; 4] = [
    PipeField::DimOrder1,
    PipeField::DimOrder2,
    PipeField::DimOrder3,
    PipeField::DimOrder4,
];

impl AxisFields {
    /// Fields of physical slot `slot` (1 = F1 .. 4 = F4).
    pub const fn for_slot(slot: usize) -> Option<&'static AxisFields> {
        match slot {
            1..=4 => Some(&SLOTS[slot - 1]),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_offsets_are_unique() {
        let mut seen = HashSet::new();
        for field in PipeField::ALL {
            assert!(seen.insert(field.offset()), "duplicate offset for {:?}", field);
        }
    }

    #[test]
    fn test_fields_fit_in_header() {
        for field in PipeField::ALL {
            let end = field.offset() + field.kind().words();
            assert!(end <= HEADER_WORDS, "{} runs past the header", field.name());
        }
    }

    #[test]
    fn test_text_fields_do_not_overlap() {
        let mut occupied = vec![None; HEADER_WORDS];
        for field in PipeField::ALL {
            for word in field.offset()..field.offset() + field.kind().words() {
                assert!(
                    occupied[word].is_none(),
                    "{} overlaps {:?}",
                    field.name(),
                    occupied[word]
                );
                occupied[word] = Some(field.name());
            }
        }
    }

    #[test]
    fn test_table_is_sorted() {
        let offsets: Vec<usize> = PipeField::ALL.iter().map(|f| f.offset()).collect();
        let mut sorted = offsets.clone();
        sorted.sort_unstable();
        assert_eq!(offsets, sorted);
    }

    #[test]
    fn test_well_known_offsets() {
        assert_eq!(PipeField::Magic.offset(), 0);
        assert_eq!(PipeField::FltOrder.offset(), 2);
        assert_eq!(PipeField::DimCount.offset(), 9);
        assert_eq!(PipeField::Size.offset(), 99);
        assert_eq!(PipeField::SpecNum.offset(), 219);
        assert_eq!(PipeField::Transposed.offset(), 221);
        assert_eq!(PipeField::Title.kind(), FieldKind::Text { words: 15 });
        assert_eq!(PipeField::Magic.kind(), FieldKind::Int);
    }

    #[test]
    fn test_lookup_by_offset_and_name() {
        assert_eq!(PipeField::from_offset(106), Some(PipeField::QuadFlag));
        assert_eq!(PipeField::from_offset(3), None);
        assert_eq!(PipeField::from_name("FDF2OBS"), Some(PipeField::F2Obs));
        assert_eq!(PipeField::from_name("FDNOPE"), None);
    }

    #[test]
    fn test_axis_slots() {
        assert!(AxisFields::for_slot(0).is_none());
        assert!(AxisFields::for_slot(5).is_none());

        let f2 = AxisFields::for_slot(2).unwrap();
        assert_eq!(f2.quad_flag, PipeField::F2QuadFlag);
        assert_eq!(f2.label.offset(), 16);

        let slots: Vec<_> = (1..=4).map(|s| AxisFields::for_slot(s).unwrap().obs).collect();
        assert_eq!(
            slots,
            vec![
                PipeField::F1Obs,
                PipeField::F2Obs,
                PipeField::F3Obs,
                PipeField::F4Obs
            ]
        );
    }
}
