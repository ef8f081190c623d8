use serde::Serialize;

/// Where the page data came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SourceType {
    Raw,
    Processed,
    Calculated,
    Imported,
    Unknown(u32),
}

impl SourceType {
    pub fn from_raw(raw: u32) -> Self {
        match raw {
            0 => Self::Raw,
            1 => Self::Processed,
            2 => Self::Calculated,
            3 => Self::Imported,
            other => Self::Unknown(other),
        }
    }

    pub fn name(self) -> Option<&'static str> {
        match self {
            Self::Raw => Some("Raw"),
            Self::Processed => Some("Processed"),
            Self::Calculated => Some("Calculated"),
            Self::Imported => Some("Imported"),
            Self::Unknown(_) => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ScanDirection {
    Right,
    Left,
    Up,
    Down,
    Unknown(u32),
}

impl ScanDirection {
    pub fn from_raw(raw: u32) -> Self {
        match raw {
            0 => Self::Right,
            1 => Self::Left,
            2 => Self::Up,
            3 => Self::Down,
            other => Self::Unknown(other),
        }
    }

    pub fn name(self) -> Option<&'static str> {
        match self {
            Self::Right => Some("Right"),
            Self::Left => Some("Left"),
            Self::Up => Some("Up"),
            Self::Down => Some("Down"),
            Self::Unknown(_) => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ImageType {
    Normal,
    Autocorrelated,
    Unknown(u32),
}

impl ImageType {
    pub fn from_raw(raw: u32) -> Self {
        match raw {
            0 => Self::Normal,
            1 => Self::Autocorrelated,
            other => Self::Unknown(other),
        }
    }

    pub fn raw(self) -> u32 {
        match self {
            Self::Normal => 0,
            Self::Autocorrelated => 1,
            Self::Unknown(raw) => raw,
        }
    }
}

/// What kind of measurement the page holds. SM3 stops at `Afm100`; the
/// later discriminants only occur in SM4 files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PageType {
    Undefined,
    Topographic,
    Current,
    Aux,
    Force,
    Signal,
    Fft,
    NoisePowerSpectrum,
    LineTest,
    Oscilloscope,
    IvSpectra,
    Iv4x4,
    Iv8x8,
    Iv16x16,
    Iv32x32,
    IvCenter,
    InteractiveSpectra,
    Autocorrelation,
    IzSpectra,
    Gain4Topography,
    Gain8Topography,
    Gain4Current,
    Gain8Current,
    Iv64x64,
    AutocorrelationSpectrum,
    Counter,
    MultichannelAnalyser,
    Afm100,
    Cits,
    Gpib,
    VideoChannel,
    ImageOutSpectra,
    Datalog,
    Ecset,
    Ecdata,
    DspAd,
    DiscreteSpectroscopyPp,
    ImageDiscreteSpectroscopy,
    RampSpectroscopyRp,
    DiscreteSpectroscopyRp,
    Unknown(u32),
}

impl PageType {
    pub fn from_raw(raw: u32) -> Self {
        match raw {
            0 => Self::Undefined,
            1 => Self::Topographic,
            2 => Self::Current,
            3 => Self::Aux,
            4 => Self::Force,
            5 => Self::Signal,
            6 => Self::Fft,
            7 => Self::NoisePowerSpectrum,
            8 => Self::LineTest,
            9 => Self::Oscilloscope,
            10 => Self::IvSpectra,
            11 => Self::Iv4x4,
            12 => Self::Iv8x8,
            13 => Self::Iv16x16,
            14 => Self::Iv32x32,
            15 => Self::IvCenter,
            16 => Self::InteractiveSpectra,
            17 => Self::Autocorrelation,
            18 => Self::IzSpectra,
            19 => Self::Gain4Topography,
            20 => Self::Gain8Topography,
            21 => Self::Gain4Current,
            22 => Self::Gain8Current,
            23 => Self::Iv64x64,
            24 => Self::AutocorrelationSpectrum,
            25 => Self::Counter,
            26 => Self::MultichannelAnalyser,
            27 => Self::Afm100,
            28 => Self::Cits,
            29 => Self::Gpib,
            30 => Self::VideoChannel,
            31 => Self::ImageOutSpectra,
            32 => Self::Datalog,
            33 => Self::Ecset,
            34 => Self::Ecdata,
            35 => Self::DspAd,
            36 => Self::DiscreteSpectroscopyPp,
            37 => Self::ImageDiscreteSpectroscopy,
            38 => Self::RampSpectroscopyRp,
            39 => Self::DiscreteSpectroscopyRp,
            other => Self::Unknown(other),
        }
    }

    pub fn name(self) -> Option<&'static str> {
        match self {
            Self::Topographic => Some("Topographic"),
            Self::Current => Some("Current"),
            Self::Aux => Some("Aux"),
            Self::Force => Some("Force"),
            Self::Signal => Some("Signal"),
            Self::Fft => Some("FFT transform"),
            Self::NoisePowerSpectrum => Some("Noise power spectrum"),
            Self::LineTest => Some("Line test"),
            Self::Oscilloscope => Some("Oscilloscope"),
            Self::IvSpectra => Some("IV spectra"),
            Self::Iv4x4 => Some("Image IV 4x4"),
            Self::Iv8x8 => Some("Image IV 8x8"),
            Self::Iv16x16 => Some("Image IV 16x16"),
            Self::Iv32x32 => Some("Image IV 32x32"),
            Self::IvCenter => Some("Image IV Center"),
            Self::InteractiveSpectra => Some("Interactive spectra"),
            Self::Autocorrelation => Some("Autocorrelation"),
            Self::IzSpectra => Some("IZ spectra"),
            Self::Gain4Topography => Some("4 gain topography"),
            Self::Gain8Topography => Some("8 gain topography"),
            Self::Gain4Current => Some("4 gain current"),
            Self::Gain8Current => Some("8 gain current"),
            Self::Iv64x64 => Some("Image IV 64x64"),
            Self::AutocorrelationSpectrum => Some("Autocorrelation spectrum"),
            Self::Counter => Some("Counter data"),
            Self::MultichannelAnalyser => Some("Multichannel analyser"),
            Self::Afm100 => Some("AFM using AFM-100"),
            Self::Cits => Some("CITS"),
            Self::Gpib => Some("GPIB"),
            Self::VideoChannel => Some("Video channel"),
            Self::ImageOutSpectra => Some("Image OUT spectra"),
            Self::Datalog => Some("I_Datalog"),
            Self::Ecset => Some("I_Ecset"),
            Self::Ecdata => Some("I_Ecdata"),
            Self::DspAd => Some("DSP channel"),
            Self::DiscreteSpectroscopyPp => Some("Discrete spectroscopy (present pos)"),
            Self::ImageDiscreteSpectroscopy => Some("Image discrete spectroscopy"),
            Self::RampSpectroscopyRp => Some("Ramp spectroscopy (relative points)"),
            Self::DiscreteSpectroscopyRp => Some("Discrete spectroscopy (relative points)"),
            Self::Undefined | Self::Unknown(_) => None,
        }
    }
}

/// Line-page sub-kind. Discriminant 5 has never been observed and decodes
/// as `Unknown(5)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LineType {
    NotALine,
    Histogram,
    CrossSection,
    LineTest,
    Oscilloscope,
    NoisePowerSpectrum,
    IvSpectrum,
    IzSpectrum,
    ImageXAverage,
    ImageYAverage,
    NoiseAutocorrelationSpectrum,
    MultichannelAnalyserData,
    RenormalizedIv,
    ImageHistogramSpectra,
    ImageCrossSection,
    ImageAverage,
    ImageCrossSectionG,
    ImageOutSpectra,
    DatalogSpectrum,
    Gxy,
    Electrochemistry,
    DiscreteSpectroscopy,
    DscopeDatalogging,
    TimeSpectroscopy,
    ZoomFft,
    FrequencySweep,
    PhaseRotate,
    FiberSweep,
    Unknown(u32),
}

impl LineType {
    pub fn from_raw(raw: u32) -> Self {
        match raw {
            0 => Self::NotALine,
            1 => Self::Histogram,
            2 => Self::CrossSection,
            3 => Self::LineTest,
            4 => Self::Oscilloscope,
            6 => Self::NoisePowerSpectrum,
            7 => Self::IvSpectrum,
            8 => Self::IzSpectrum,
            9 => Self::ImageXAverage,
            10 => Self::ImageYAverage,
            11 => Self::NoiseAutocorrelationSpectrum,
            12 => Self::MultichannelAnalyserData,
            13 => Self::RenormalizedIv,
            14 => Self::ImageHistogramSpectra,
            15 => Self::ImageCrossSection,
            16 => Self::ImageAverage,
            17 => Self::ImageCrossSectionG,
            18 => Self::ImageOutSpectra,
            19 => Self::DatalogSpectrum,
            20 => Self::Gxy,
            21 => Self::Electrochemistry,
            22 => Self::DiscreteSpectroscopy,
            23 => Self::DscopeDatalogging,
            24 => Self::TimeSpectroscopy,
            25 => Self::ZoomFft,
            26 => Self::FrequencySweep,
            27 => Self::PhaseRotate,
            28 => Self::FiberSweep,
            other => Self::Unknown(other),
        }
    }

    pub fn raw(self) -> u32 {
        match self {
            Self::NotALine => 0,
            Self::Histogram => 1,
            Self::CrossSection => 2,
            Self::LineTest => 3,
            Self::Oscilloscope => 4,
            Self::NoisePowerSpectrum => 6,
            Self::IvSpectrum => 7,
            Self::IzSpectrum => 8,
            Self::ImageXAverage => 9,
            Self::ImageYAverage => 10,
            Self::NoiseAutocorrelationSpectrum => 11,
            Self::MultichannelAnalyserData => 12,
            Self::RenormalizedIv => 13,
            Self::ImageHistogramSpectra => 14,
            Self::ImageCrossSection => 15,
            Self::ImageAverage => 16,
            Self::ImageCrossSectionG => 17,
            Self::ImageOutSpectra => 18,
            Self::DatalogSpectrum => 19,
            Self::Gxy => 20,
            Self::Electrochemistry => 21,
            Self::DiscreteSpectroscopy => 22,
            Self::DscopeDatalogging => 23,
            Self::TimeSpectroscopy => 24,
            Self::ZoomFft => 25,
            Self::FrequencySweep => 26,
            Self::PhaseRotate => 27,
            Self::FiberSweep => 28,
            Self::Unknown(raw) => raw,
        }
    }

    pub fn name(self) -> Option<&'static str> {
        match self {
            Self::Histogram => Some("Histogram"),
            Self::CrossSection => Some("Cross section"),
            Self::LineTest => Some("Line test"),
            Self::Oscilloscope => Some("Oscilloscope"),
            Self::NoisePowerSpectrum => Some("Noise power spectrum"),
            Self::IvSpectrum => Some("I-V spectrum"),
            Self::IzSpectrum => Some("I-Z spectrum"),
            Self::ImageXAverage => Some("Image x average"),
            Self::ImageYAverage => Some("Image y average"),
            Self::NoiseAutocorrelationSpectrum => Some("Noise autocorrelation spectrum"),
            Self::MultichannelAnalyserData => Some("Multichannel analyser data"),
            Self::RenormalizedIv => Some("Renormalized I-V"),
            Self::ImageHistogramSpectra => Some("Image histogram spectra"),
            Self::ImageCrossSection => Some("Image cross section"),
            Self::ImageAverage => Some("Image average"),
            _ => None,
        }
    }
}

/// The fixed string slots a page may carry. SM3 defines the first twelve;
/// SM4 appends the rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringKind {
    Label,
    SystemText,
    SessionText,
    UserText,
    Path,
    Date,
    Time,
    XUnits,
    YUnits,
    ZUnits,
    XLabel,
    YLabel,
    StatusChannelText,
    CompletedLineCount,
    OversamplingCount,
    SlicedVoltage,
    PllProStatus,
}

impl StringKind {
    pub const COUNT: usize = 17;
    /// How many of the slots SM3 files know about.
    pub const SM3_COUNT: usize = 12;
}

/// The decoded string slots of one page, indexed by [`StringKind`]. Slots
/// the file did not fill stay `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PageStrings {
    slots: [Option<String>; StringKind::COUNT],
}

impl PageStrings {
    pub fn get(&self, kind: StringKind) -> Option<&str> {
        self.slots[kind as usize].as_deref()
    }

    pub(crate) fn set(&mut self, index: usize, value: String) {
        if index < StringKind::COUNT {
            self.slots[index] = Some(value);
        }
    }

    pub fn label(&self) -> Option<&str> {
        self.get(StringKind::Label)
    }

    pub fn x_units(&self) -> Option<&str> {
        self.get(StringKind::XUnits)
    }

    pub fn y_units(&self) -> Option<&str> {
        self.get(StringKind::YUnits)
    }

    pub fn z_units(&self) -> Option<&str> {
        self.get(StringKind::ZUnits)
    }
}

/// Flattened string-keyed metadata (PRM contents, page descriptions).
pub type MetadataMap = hashbrown::HashMap<String, String>;
