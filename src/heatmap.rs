//! Live station readings for a pollution heat map.

use rayon::prelude::*;
use serde::Serialize;

use crate::aqi::Band;
use crate::error::Result;
use crate::models::{Bounds, GeoPoint, Station, StationPollutants};
use crate::traits::StationDirectory;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatmapStation {
    pub id: usize,
    pub uid: i64,
    pub point: GeoPoint,
    pub aqi: Option<u32>,
    pub band: Option<Band>,
    pub location: String,
    /// `None` when the station detail could not be fetched.
    pub pollutants: Option<StationPollutants>,
}

impl HeatmapStation {
    pub fn color(&self) -> Option<&'static str> {
        self.band.map(Band::hex_color)
    }
}

/// Lists the stations inside `bounds` and enriches each with its pollutant
/// breakdown. Listing failures are returned; detail failures only blank the
/// affected station's pollutants.
pub fn heatmap<D>(directory: &D, bounds: Bounds) -> Result<Vec<HeatmapStation>>
where
    D: StationDirectory + ?Sized,
{
    let stations = directory.stations_in(bounds)?;
    tracing::info!(stations = stations.len(), "fetching station details");

    Ok(stations
        .into_par_iter()
        .enumerate()
        .map(|(id, station)| enrich(directory, id, station))
        .collect())
}

fn enrich<D>(directory: &D, id: usize, station: Station) -> HeatmapStation
where
    D: StationDirectory + ?Sized,
{
    let pollutants = match directory.station_pollutants(station.uid) {
        Ok(pollutants) => Some(pollutants),
        Err(err) => {
            tracing::warn!(uid = station.uid, error = %err, "station detail unavailable");
            None
        }
    };
    HeatmapStation {
        id,
        uid: station.uid,
        point: station.point,
        aqi: station.aqi,
        band: station.aqi.map(Band::for_station_aqi),
        location: station.name,
        pollutants,
    }
}
