//! End-to-end pipeline tests over a GeoTIFF raster store on disk.
//!
//! The fixture is a 4x4 grid of 0.5 degree cells over the default export
//! region (-77..-75 E, 39..41 N). Each column exercises one scenario:
//!
//! - column 0: precipitation 1000, May-Aug mean [17, 20, 22, 19], April
//!   minimum 5, pH x10 = 62 (suitable)
//! - column 1: as column 0 but precipitation 1600
//! - column 2: as column 0 but pH x10 = 50
//! - column 3: as column 0, except July mean temperature is no-data in the
//!   bottom row

use cropsuit_core::crs::METERS_PER_DEGREE;
use cropsuit_core::io::{read_geotiff, write_geotiff};
use cropsuit_core::{GeoTransform, Raster, CRS};
use cropsuit_suitability::prelude::*;
use cropsuit_suitability::SuitabilitySummary;
use std::path::Path;

const ROWS: usize = 4;
const COLS: usize = 4;

fn band(value: impl Fn(usize, usize) -> f64) -> Raster<f64> {
    let mut r = Raster::new(ROWS, COLS);
    r.set_transform(GeoTransform::new(-77.0, 41.0, 0.5, -0.5));
    r.set_crs(Some(CRS::wgs84()));
    r.set_nodata(Some(-9999.0));
    for row in 0..ROWS {
        for col in 0..COLS {
            r.set(row, col, value(row, col)).unwrap();
        }
    }
    r
}

fn mean_temperature(month: usize) -> f64 {
    match month {
        5 => 17.0,
        6 => 20.0,
        7 => 22.0,
        8 => 19.0,
        _ => 5.0,
    }
}

/// Write the climate collection and soil image under `root`.
fn write_store(root: &Path) {
    let catalog = DatasetCatalog::default();
    let climate = root.join(&catalog.climate);
    std::fs::create_dir_all(&climate).unwrap();

    for month in 1..=12 {
        let ppt = band(|_, col| if col == 1 { 1600.0 / 12.0 } else { 1000.0 / 12.0 });
        write_geotiff(&ppt, climate.join(format!("ppt_{month:02}.tif"))).unwrap();

        let tmean = band(|row, col| {
            if month == 7 && col == 3 && row == ROWS - 1 {
                -9999.0
            } else {
                mean_temperature(month)
            }
        });
        write_geotiff(&tmean, climate.join(format!("tmean_{month:02}.tif"))).unwrap();

        let tmin = band(|_, _| if month == 4 { 5.0 } else { -2.0 });
        write_geotiff(&tmin, climate.join(format!("tmin_{month:02}.tif"))).unwrap();
    }

    let soil = root.join(&catalog.soil);
    std::fs::create_dir_all(&soil).unwrap();
    let ph = band(|_, col| if col == 2 { 50.0 } else { 62.0 });
    write_geotiff(&ph, soil.join(format!("{}.tif", catalog.soil_ph_band))).unwrap();
}

fn geographic_config() -> PipelineConfig {
    let mut config = PipelineConfig::default();
    config.export.crs = "EPSG:4326".to_string();
    config.export.scale = METERS_PER_DEGREE / 2.0;
    config
}

#[test]
fn scenarios_on_source_grid() {
    let data = tempfile::tempdir().unwrap();
    write_store(data.path());

    let pipeline = SuitabilityPipeline::new(geographic_config(), CropThresholds::SWEET_CORN);
    let result = pipeline.materialize(&DirectorySource::new(data.path())).unwrap();

    for row in 0..ROWS {
        assert_eq!(result.raster.get(row, 0).unwrap(), 1, "column 0 is suitable");
        assert_eq!(result.raster.get(row, 1).unwrap(), 0, "precipitation 1600 is masked");
        assert_eq!(result.raster.get(row, 2).unwrap(), 0, "pH 5.0 is masked");
    }
    assert_eq!(result.raster.get(0, 3).unwrap(), 1);
    assert_eq!(result.raster.get(ROWS - 1, 3).unwrap(), 0, "no-data input is masked");

    assert_eq!(
        result.summary,
        SuitabilitySummary {
            suitable: 7,
            unsuitable: 8,
            nodata: 1
        }
    );
}

#[test]
fn export_reads_back_as_ones_and_nan() {
    let data = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    write_store(data.path());

    let pipeline = SuitabilityPipeline::new(geographic_config(), CropThresholds::SWEET_CORN);
    let report = pipeline
        .run(&DirectorySource::new(data.path()), &DirectoryDestination::new(out.path()))
        .unwrap();

    assert_eq!(report.raster_path, out.path().join("CornSuitabilityGEE.tif"));
    assert_eq!((report.rows, report.cols), (ROWS, COLS));
    assert_eq!(report.exported_suitable, 7);
    assert!(report.metadata_path.is_file());
    assert!(report.quicklook_path.is_none());

    let exported: Raster<f64> = read_geotiff(&report.raster_path).unwrap();
    assert_eq!(exported.shape(), (ROWS, COLS));
    assert_eq!(exported.crs().map(|c| c.epsg()), Some(4326));
    assert_eq!(exported.get(2, 0).unwrap(), 1.0);
    assert!(exported.get(2, 1).unwrap().is_nan());
    assert!(exported.get(2, 2).unwrap().is_nan());
    assert!(exported.get(ROWS - 1, 3).unwrap().is_nan());
    assert_eq!(exported.statistics().valid_count, 7);
}

#[test]
fn default_export_is_web_mercator_at_250m() {
    let data = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    write_store(data.path());

    let pipeline = SuitabilityPipeline::new(PipelineConfig::default(), CropThresholds::SWEET_CORN);
    let destination = DirectoryDestination::new(out.path()).with_quicklook(true);
    let report = pipeline.run(&DirectorySource::new(data.path()), &destination).unwrap();

    assert_eq!((report.rows, report.cols), (1163, 891));
    assert!(report.quicklook_path.as_ref().is_some_and(|p| p.is_file()));

    let exported: Raster<f64> = read_geotiff(&report.raster_path).unwrap();
    assert_eq!(exported.crs().map(|c| c.epsg()), Some(3857));
    assert!((exported.cell_size() - 250.0).abs() < 1e-9);
    assert!(exported.statistics().valid_count > 0);
    assert!(exported.statistics().valid_count < exported.len());
}

#[test]
fn missing_soil_fails_in_load_stage() {
    let data = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    write_store(data.path());
    let catalog = DatasetCatalog::default();
    std::fs::remove_file(
        data.path()
            .join(&catalog.soil)
            .join(format!("{}.tif", catalog.soil_ph_band)),
    )
    .unwrap();

    let pipeline = SuitabilityPipeline::new(geographic_config(), CropThresholds::SWEET_CORN);
    let err = pipeline
        .run(&DirectorySource::new(data.path()), &DirectoryDestination::new(out.path()))
        .unwrap_err();

    assert_eq!(err.stage(), "load");
    match err {
        PipelineError::Load(LoadError::DataUnavailable { dataset, band, .. }) => {
            assert_eq!(dataset, catalog.soil);
            assert_eq!(band, catalog.soil_ph_band);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(!out.path().join("CornSuitabilityGEE.tif").exists());
}

#[test]
fn misaligned_soil_fails_in_evaluate_stage() {
    let data = tempfile::tempdir().unwrap();
    write_store(data.path());
    let catalog = DatasetCatalog::default();
    let mut shifted = band(|_, _| 62.0);
    shifted.set_transform(GeoTransform::new(-76.9, 41.0, 0.5, -0.5));
    write_geotiff(
        &shifted,
        data.path()
            .join(&catalog.soil)
            .join(format!("{}.tif", catalog.soil_ph_band)),
    )
    .unwrap();

    let pipeline = SuitabilityPipeline::new(geographic_config(), CropThresholds::SWEET_CORN);
    let err = pipeline
        .materialize(&DirectorySource::new(data.path()))
        .unwrap_err();
    assert_eq!(err.stage(), "evaluate");
}

#[test]
fn invalid_export_fails_before_loading() {
    // Empty store: a load would fail, so an export error proves ordering
    let data = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();

    let mut config = PipelineConfig::default();
    config.export.crs = "EPSG:9999".to_string();
    let pipeline = SuitabilityPipeline::new(config, CropThresholds::SWEET_CORN);
    let err = pipeline
        .run(&DirectorySource::new(data.path()), &DirectoryDestination::new(out.path()))
        .unwrap_err();

    assert_eq!(err.stage(), "export");
    assert!(matches!(err, PipelineError::Export(ExportError::UnsupportedCrs(_))));
}
