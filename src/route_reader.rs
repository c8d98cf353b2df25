/// GPX route loading.
///
/// Every track and segment is flattened into one ordered list of points. Files
/// the `gpx` crate rejects get one retry after minimal repairs that never touch
/// coordinates or elevations.
use std::fs::File;
use std::io::{BufReader, Cursor, Read};
use std::path::{Path, PathBuf};

use gpx::{read, Gpx};
use log::{debug, warn};
use walkdir::WalkDir;

use crate::error::{ProfileError, Result};
use crate::geodesic::RoutePoint;

#[derive(Debug, Clone)]
pub struct Route {
    pub name: Option<String>,
    pub points: Vec<RoutePoint>,
}

pub fn read_route(path: &Path) -> Result<Route> {
    let mut content = String::new();
    File::open(path)?.read_to_string(&mut content)?;

    let gpx = parse_gpx_tolerantly(&content)?;
    let route = route_from_gpx(&gpx)?;

    debug!(
        "Loaded {} points from {}",
        route.points.len(),
        path.display()
    );
    Ok(route)
}

pub fn parse_gpx_tolerantly(content: &str) -> Result<Gpx> {
    let first_error = match read(BufReader::new(Cursor::new(content.as_bytes()))) {
        Ok(gpx) => return Ok(gpx),
        Err(e) => e,
    };

    warn!("Standard GPX parsing failed ({}), retrying with repairs", first_error);

    let repaired = repair_gpx_content(content);
    read(BufReader::new(Cursor::new(repaired.as_bytes()))).map_err(|e| {
        ProfileError::Gpx(format!(
            "{} (after repair attempt: {})",
            first_error, e
        ))
    })
}

/// Flatten all tracks and segments in file order. Every point must carry an elevation.
pub fn route_from_gpx(gpx: &Gpx) -> Result<Route> {
    let mut points = Vec::new();

    for (track_index, track) in gpx.tracks.iter().enumerate() {
        for (segment_index, segment) in track.segments.iter().enumerate() {
            for (point_index, waypoint) in segment.points.iter().enumerate() {
                let elevation = waypoint.elevation.ok_or_else(|| {
                    ProfileError::MalformedInput(format!(
                        "track {} segment {} point {} has no elevation",
                        track_index, segment_index, point_index
                    ))
                })?;
                let position = waypoint.point();
                points.push(RoutePoint::new(position.y(), position.x(), elevation));
            }
        }
    }

    if points.len() < 2 {
        return Err(ProfileError::MalformedInput(format!(
            "route has {} track points, need at least 2",
            points.len()
        )));
    }

    Ok(Route {
        name: gpx.tracks.first().and_then(|t| t.name.clone()),
        points,
    })
}

/// Safe fixes only: XML declaration, missing version, stray control characters,
/// and closing tags lost to truncation.
pub fn repair_gpx_content(content: &str) -> String {
    let mut repaired: String = content
        .chars()
        .filter(|&c| matches!(c, '\t' | '\n' | '\r') || !c.is_control())
        .collect();

    repaired = repaired.trim().to_string();

    if !repaired.starts_with("<?xml") {
        repaired = format!("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n{}", repaired);
    }

    if let Some(start) = repaired.find("<gpx") {
        if let Some(len) = repaired[start..].find('>') {
            let tag = &repaired[start..start + len];
            if !tag.contains("version=") {
                let insert_at = start + "<gpx".len();
                repaired.insert_str(insert_at, " version=\"1.1\"");
            }
        }
    }

    if repaired.contains("<gpx") && !repaired.ends_with("</gpx>") {
        for tag in ["trkseg", "trk"] {
            let opened = repaired.matches(&format!("<{}>", tag)).count();
            let closed = repaired.matches(&format!("</{}>", tag)).count();
            for _ in closed..opened {
                repaired.push_str(&format!("\n</{}>", tag));
            }
        }
        repaired.push_str("\n</gpx>");
    }

    repaired
}

/// A single file, or every `.gpx` file below a folder in sorted order.
pub fn collect_gpx_files(path: &Path) -> Result<Vec<PathBuf>> {
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(path).sort_by_file_name() {
        let entry = entry.map_err(|e| ProfileError::Io(e.into()))?;
        let is_gpx = entry
            .path()
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("gpx"))
            .unwrap_or(false);
        if entry.file_type().is_file() && is_gpx {
            files.push(entry.path().to_path_buf());
        }
    }

    Ok(files)
}
