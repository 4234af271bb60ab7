//! Packet type and sonar model names
//!
//! Hardcoded reference data used to label statistics entries and the
//! sonar recorded in the document header. Lookups never fail: ids that are
//! not listed (or listed without text) resolve to `"Unknown"`.

use serde::Serialize;

const UNKNOWN: &str = "Unknown";

// ============================================================================
// Packet types
// ============================================================================

/// A known record header type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PacketType {
    pub id: u8,
    pub name: &'static str,
    pub description: &'static str,
}

const fn packet(id: u8, name: &'static str, description: &'static str) -> PacketType {
    PacketType {
        id,
        name,
        description,
    }
}

/// All header types defined by the format, in id order
pub const PACKET_TYPES: &[PacketType] = &[
    packet(0, "Sonar", "Sidescan And subbottom"),
    packet(1, "Notes", "Notes - text annotation"),
    packet(2, "Bathy", "Bathymetry (Seabat, Odom)"),
    packet(3, "Attitude", "TSS Or MRU attitude (pitch, roll, heave, yaw)"),
    packet(4, "Forward", "Forward-look sonar (polar display)"),
    packet(5, "Elac", "Elac multibeam"),
    packet(6, "RawSerial", "Raw data from serial port"),
    packet(7, "EmbeddedHead", "Embedded header Structure"),
    packet(8, "HiddenSonar", "Hidden (non-displayable) ping"),
    packet(9, "SeaviewProcessedBathy", "Bathymetry (angles) for Seaview"),
    packet(10, "SeaviewDepths", "Bathymetry from Seaview data (depths)"),
    packet(11, "RsvdHighSpeedSensor", "Used by Klein. 0=roll, 1=yaw"),
    packet(12, "EchoStrength", "Elac EchoStrength (10 values)"),
    packet(13, "Georec", "Used to store mosaic parameters"),
    packet(14, "KleinRawBathy", "Bathymetry data from the Klein 5000"),
    packet(15, "HighSpeedSensor2", "High speed sensor from Klein 5000"),
    packet(16, "ElacXse", "Elac dual-head"),
    packet(17, "BathyXYZA", "Processed bathymetry data"),
    packet(18, "K5000BathyIQ", "Raw IQ data from Klein 5000 server"),
    packet(19, "BathySnippet", "Bathymetry snippet data"),
    packet(20, "Gps", "GPS Position"),
    packet(21, "Stat", "GPS statistics"),
    packet(22, "SingleBeam", "Bathymetry data from singlebeam echosounder"),
    packet(23, "Gyro", "Heading/Speed Sensor"),
    packet(24, "TrackPoint", ""),
    packet(25, "MultiBeam", ""),
    packet(26, "QpsSingleBeam", ""),
    packet(27, "QpsMultiTx", ""),
    packet(28, "QpsMultiBeam", ""),
    packet(42, "Navigation", "Source time-stamped navigation data"),
    packet(50, "Time", ""),
    packet(60, "BenthosCaatiSara", "Custom Benthos data."),
    packet(61, "7125", "7125 Bathy Data"),
    packet(62, "7125Snippet", "7125 Bathy Data Snippets"),
    packet(65, "QinsyR2SonicBathy", "QINSy R2Sonic bathymetry data"),
    packet(66, "QinsyR2SonicFts", "QINSy R2Sonics Foot Print Time Series (snippets)"),
    packet(68, "R2SonicBathy", "Triton R2Sonic bathymetry data"),
    packet(69, "R2SonicFts", "Triton R2Sonic Footprint Time Series"),
    packet(70, "CodaEchoscopeData", "Custom CODA Echoscope Data"),
    packet(71, "CodaEchoscopeConfig", "Custom CODA Echoscope Data"),
    packet(72, "CodaEchoscopeImage", "Custom CODA Echoscope Data"),
    packet(73, "Edgetech4600", ""),
    packet(78, "Reson7018WaterColumn", ""),
    packet(79, "R2SonicWaterColumn", ""),
    packet(84, "SourceTimeGyro", "Source time-stamped gyro data"),
    packet(100, "Position", "Raw position packet - Reserved for use by Reson, Inc. RESON ONLY."),
    packet(102, "BathyProcessed", ""),
    packet(103, "AttitudeProcessed", ""),
    packet(104, "SingleBeamProcessed", ""),
    packet(105, "AuxProcessed", "Aux Channel + AuxAltitude + Magnetometer."),
    packet(106, "Klein3000DataPage", ""),
    packet(107, "PositionRawNavigation", ""),
    packet(108, "KleinV4DataPage", ""),
    packet(199, "Custom", "Custom Vendor data"),
    packet(200, "UserDefined", "This packet type is reserved for specific applications."),
];

/// Get a packet type by header type id
pub fn packet_type_by_id(id: u8) -> Option<&'static PacketType> {
    PACKET_TYPES.iter().find(|p| p.id == id)
}

/// Display name for a header type
pub fn packet_type_name(id: u8) -> &'static str {
    non_blank(packet_type_by_id(id).map(|p| p.name))
}

/// Description for a header type
pub fn packet_type_description(id: u8) -> &'static str {
    non_blank(packet_type_by_id(id).map(|p| p.description))
}

// ============================================================================
// Sonar models
// ============================================================================

/// A known sonar system, as stored in the document header's sonar type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SonarModel {
    pub id: u16,
    pub name: &'static str,
    pub description: &'static str,
}

const fn sonar(id: u16, name: &'static str, description: &'static str) -> SonarModel {
    SonarModel {
        id,
        name,
        description,
    }
}

/// All sonar models, in id order
pub const SONAR_MODELS: &[SonarModel] = &[
    sonar(0, "None", "Default"),
    sonar(1, "Jamstec", "Jamstec chirp 2-channel subbottom"),
    sonar(2, "AnalogC31", "PC31 8-channel"),
    sonar(3, "Sis1000", "Chirp SIS-1000 sonar"),
    sonar(4, "Analog32Chan", "Spectrum with 32-channel DSPlink card"),
    sonar(5, "Klein2000", "Klein system 2000 with digital interface"),
    sonar(6, "Rws", "Standard PC31 analog with special nav code"),
    sonar(7, "Df1000", "EG&G DF1000 digital interface"),
    sonar(8, "Seabat", "Reson SEABAT 900x analog/serial"),
    sonar(9, "Klein595", "4-chan Klein 595, same as ANALOG_C31"),
    sonar(10, "Egg260", "2-channel EGG260, same as ANALOG_C31"),
    sonar(11, "SonatechDds", "Sonatech Diver Detection System on Spectrum DSP32C"),
    sonar(12, "Echoscan", "Odom EchoScanII multibeam (with simultaneous analog sidescan)"),
    sonar(13, "Elac", "Elac multibeam system"),
    sonar(14, "Klein5000", "Klein system 5000 with digital interface"),
    sonar(15, "Reson8101", "Reson Seabat 8101"),
    sonar(16, "Imagenex858", "Imagenex model 858"),
    sonar(17, "UsnSilos", "USN SILOS with 3-channel analog"),
    sonar(18, "SonatechShr", "Sonatech Super-high res sidescan sonar"),
    sonar(19, "DelphAu32", "Delph AU32 Analog input (2 channel)"),
    sonar(20, "GenericMemory", "Generic sonar using the memory-mapped file interface"),
    sonar(21, "SimradSm2000", "Simrad SM2000 Multibeam Echo Sounder"),
    sonar(22, "Audio", "Standard multimedia audio"),
    sonar(23, "EdgetechAci", "Edgetech (EG&G) ACI card for 260 sonar through PC31 card"),
    sonar(24, "EdgetechBlackBox", "Edgetech Black Box"),
    sonar(25, "FugroDeepTow", "Fugro deeptow"),
    sonar(26, "EdgetechCC", "C&C Edgetech Chirp conversion program"),
    sonar(27, "DtiSas", "DTI SAS Synthetic Aperture processor (memmap file)"),
    sonar(28, "OsirisSss", "Fugro Osiris AUV Sidescan data"),
    sonar(29, "OsirisMbes", "Fugro Osiris AUV Multibeam data"),
    sonar(30, "GeoacousticsSls", "Geoacoustics SLS"),
    sonar(31, "SimradEm2000", "Simrad EM2000/EM3000"),
    sonar(32, "Klein3000", "Klein system 3000"),
    sonar(33, "ShrSss", "SHRSSS Chirp system"),
    sonar(34, "BenthosC3D", "Benthos C3D SARA/CAATI"),
    sonar(35, "EdgetechMpx", "Edgetech MP-X"),
    sonar(36, "Cmax", "CMAX"),
    sonar(37, "BenthosSis1624", "Benthos sis1624"),
    sonar(38, "Edgetech4200", "Edgetech 4200"),
    sonar(39, "BenthosSis1500", "Benthos SIS1500"),
    sonar(40, "BenthosSis1502", "Benthos SIS1502"),
    sonar(41, "BenthosSis3000", "Benthos SIS3000"),
    sonar(42, "BenthosSis7000", "Benthos SIS7000"),
    sonar(43, "Df1000Dcu", "DF1000 DCU"),
    sonar(44, "NoneSideScan", "NONE_SIDESCAN"),
    sonar(45, "NoneMultiBeam", "NONE_MULTIBEAM"),
    sonar(46, "Reson7125", "Reson 7125"),
    sonar(47, "Coda", "CODA Echoscope"),
    sonar(48, "KongsbergSas", "Kongsberg SAS"),
    sonar(49, "Qinsy", "QINSy"),
    sonar(50, "GeoacousticsDsss", "GeoAcoustics DSSS"),
    sonar(51, "CmaxUsb", "CMAX_USB"),
    sonar(52, "SwathPlusBathy", "SwathPlus Bathy"),
    sonar(53, "R2SonicQinsy", "R2Sonic QINSy"),
    sonar(54, "SwathPlusBathyConverted", "Converted SwathPlus Bathy"),
    sonar(55, "R2SonicTriton", "R2Sonic Triton"),
    sonar(56, "Edgetech4600", "Edgetech 4600"),
    sonar(57, "Klein3500", "Klein 3500"),
    sonar(58, "Klein5900", "Klein 5900"),
];

/// Get a sonar model by id
pub fn sonar_model_by_id(id: u16) -> Option<&'static SonarModel> {
    SONAR_MODELS.iter().find(|s| s.id == id)
}

/// Display name for a sonar type
pub fn sonar_model_name(id: u16) -> &'static str {
    non_blank(sonar_model_by_id(id).map(|s| s.name))
}

fn non_blank(text: Option<&'static str>) -> &'static str {
    match text {
        Some(t) if !t.trim().is_empty() => t,
        _ => UNKNOWN,
    }
}
