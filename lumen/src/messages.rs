/// Standardise what the calibration procedures print so
/// operators (and scripts scraping stdout) see a stable layout.
pub mod report {
    /// One line per captured frame of the exposure sweep.
    pub mod step;
}
