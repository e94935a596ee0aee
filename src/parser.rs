use std::fs::File as StdFile;
use std::io::{BufRead, BufReader as StdBufReader};
use std::path::Path;

use crate::config::InputFormat;
use crate::error::ParseError;
use crate::matrix::DistanceMatrix;

// TSPLIB GEO coordinates are DDD.MM (degrees and minutes)
#[allow(clippy::approx_constant)]
fn geo_to_radians(value: f64) -> f64 {
    const PI: f64 = 3.141592;
    let deg = value.trunc();
    let min = value - deg;
    PI * (deg + 5.0 * min / 3.0) / 180.0
}

// TSPLIB nint
fn calc_euc_2d_dist(n1: &Node, n2: &Node) -> f64 {
    let dx = n1.x - n2.x;
    let dy = n1.y - n2.y;
    ((dx * dx + dy * dy).sqrt() + 0.5).floor()
}

fn calc_ceil_2d_dist(n1: &Node, n2: &Node) -> f64 {
    let dx = n1.x - n2.x;
    let dy = n1.y - n2.y;
    (dx * dx + dy * dy).sqrt().ceil()
}

fn calc_geo_dist(n1: &Node, n2: &Node) -> f64 {
    const RRR: f64 = 6378.388; // Earth radius in km

    // n.x is latitude, n.y is longitude
    let lat1_rad = geo_to_radians(n1.x);
    let lon1_rad = geo_to_radians(n1.y);
    let lat2_rad = geo_to_radians(n2.x);
    let lon2_rad = geo_to_radians(n2.y);

    let q1 = (lon1_rad - lon2_rad).cos();
    let q2 = (lat1_rad - lat2_rad).cos();
    let q3 = (lat1_rad + lat2_rad).cos();

    (RRR * (0.5 * ((1.0 + q1) * q2 - (1.0 - q1) * q3)).acos() + 1.0).floor()
}

fn calc_att_dist(n1: &Node, n2: &Node) -> f64 {
    let dx = n1.x - n2.x;
    let dy = n1.y - n2.y;
    let rij = ((dx * dx + dy * dy) / 10.0).sqrt();
    let tij = rij.round();
    if tij < rij { tij + 1.0 } else { tij }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum EdgeWeightType {
    Euc2D,    // berlin52
    Ceil2D,   // dsj1000
    Geo,      // ulysses16
    Att,      // att48
    Explicit, // gr17, bayg29
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum EdgeWeightFormat {
    FullMatrix,
    UpperRow,
    LowerDiagRow,
}

#[derive(Debug, Clone)]
struct Node {
    x: f64,
    y: f64,
}

#[derive(PartialEq, Debug)]
enum ParsingSection {
    Header,
    NodeCoordSection,
    EdgeWeightSection,
}

/// A named problem instance.
#[derive(Debug, Clone)]
pub struct Instance {
    pub name: String,
    pub matrix: DistanceMatrix,
}

/// Loads `path` as TSPLIB or CSV, choosing by extension when `format` is `Auto`.
pub fn load_instance(path: &Path, format: InputFormat) -> Result<Instance, ParseError> {
    let file = StdFile::open(path).map_err(|source| ParseError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let reader = StdBufReader::new(file);

    let is_tsplib = match format {
        InputFormat::Tsplib => true,
        InputFormat::Csv => false,
        InputFormat::Auto => path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("tsp")),
    };

    if is_tsplib {
        parse_tsplib(reader)
    } else {
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Instance {
            name,
            matrix: parse_csv_matrix(reader)?,
        })
    }
}

pub fn parse_tsplib(reader: impl BufRead) -> Result<Instance, ParseError> {
    let mut name = String::new();
    let mut dimension = 0;
    let mut edge_weight_type_str = String::new();
    let mut edge_weight_format_str: Option<String> = None;
    let mut node_coords_vec: Vec<Node> = Vec::new();
    let mut explicit_weights_data: Vec<f64> = Vec::new();

    let mut current_section = ParsingSection::Header;

    for (idx, line_result) in reader.lines().enumerate() {
        let line_num = idx + 1;
        let line = line_result.map_err(|e| ParseError::Syntax {
            line: line_num,
            message: format!("read error: {}", e),
        })?;
        let line = line.trim();

        if line == "EOF" {
            break;
        }
        if line.is_empty() {
            continue;
        }

        match line {
            "NODE_COORD_SECTION" => {
                current_section = ParsingSection::NodeCoordSection;
                continue;
            }
            "EDGE_WEIGHT_SECTION" => {
                current_section = ParsingSection::EdgeWeightSection;
                continue;
            }
            "DISPLAY_DATA_SECTION" | "TOUR_SECTION" => {
                if current_section == ParsingSection::NodeCoordSection
                    && node_coords_vec.len() != dimension
                {
                    return Err(ParseError::Syntax {
                        line: line_num,
                        message: format!(
                            "section '{}' started after {} of {} node coordinates",
                            line,
                            node_coords_vec.len(),
                            dimension
                        ),
                    });
                }
                current_section = ParsingSection::Header;
                continue;
            }
            _ => {}
        }

        match current_section {
            ParsingSection::Header => {
                if let Some((key, value)) = line.split_once(':') {
                    let value = value.trim();
                    match key.trim() {
                        "NAME" => name = value.to_string(),
                        "DIMENSION" => {
                            dimension = value.parse::<usize>().map_err(|e| ParseError::Syntax {
                                line: line_num,
                                message: format!("invalid dimension '{}': {}", value, e),
                            })?;
                        }
                        "EDGE_WEIGHT_TYPE" => edge_weight_type_str = value.to_uppercase(),
                        "EDGE_WEIGHT_FORMAT" => {
                            edge_weight_format_str = Some(value.to_uppercase())
                        }
                        _ => {} // TYPE, COMMENT and other keywords carry nothing we use
                    }
                }
            }
            ParsingSection::NodeCoordSection => {
                if node_coords_vec.len() == dimension {
                    return Err(ParseError::Syntax {
                        line: line_num,
                        message: format!(
                            "unexpected data after {} node coordinates: '{}'",
                            dimension, line
                        ),
                    });
                }
                let parts: Vec<&str> = line.split_whitespace().collect();
                if parts.len() < 3 {
                    return Err(ParseError::Syntax {
                        line: line_num,
                        message: format!("malformed node coord line (expected id x y): {}", line),
                    });
                }
                let coord = |s: &str, axis: &str| {
                    s.parse::<f64>().map_err(|e| ParseError::Syntax {
                        line: line_num,
                        message: format!("invalid {} coord '{}': {}", axis, s, e),
                    })
                };
                let x = coord(parts[1], "x")?;
                let y = coord(parts[2], "y")?;
                node_coords_vec.push(Node { x, y });
            }
            ParsingSection::EdgeWeightSection => {
                for s_num in line.split_whitespace() {
                    explicit_weights_data.push(s_num.parse::<f64>().map_err(|e| {
                        ParseError::Syntax {
                            line: line_num,
                            message: format!("invalid edge weight '{}': {}", s_num, e),
                        }
                    })?);
                }
            }
        }
    }

    if dimension == 0 {
        return Err(ParseError::Malformed(
            "DIMENSION not found or is zero".to_string(),
        ));
    }

    let ewt = match edge_weight_type_str.as_str() {
        "EUC_2D" => EdgeWeightType::Euc2D,
        "CEIL_2D" => EdgeWeightType::Ceil2D,
        "GEO" => EdgeWeightType::Geo,
        "ATT" => EdgeWeightType::Att,
        "EXPLICIT" => EdgeWeightType::Explicit,
        s => {
            return Err(ParseError::Unsupported {
                what: "EDGE_WEIGHT_TYPE",
                value: s.to_string(),
            });
        }
    };

    let dist_matrix: Vec<Vec<f64>> = if ewt == EdgeWeightType::Explicit {
        let ewf = match edge_weight_format_str.as_deref() {
            Some("FULL_MATRIX") => EdgeWeightFormat::FullMatrix,
            Some("UPPER_ROW") => EdgeWeightFormat::UpperRow,
            Some("LOWER_DIAG_ROW") => EdgeWeightFormat::LowerDiagRow,
            Some(s) => {
                return Err(ParseError::Unsupported {
                    what: "EDGE_WEIGHT_FORMAT",
                    value: s.to_string(),
                });
            }
            None => {
                return Err(ParseError::Malformed(
                    "EDGE_WEIGHT_FORMAT missing for EXPLICIT type".to_string(),
                ));
            }
        };
        explicit_matrix(dimension, ewf, &explicit_weights_data)?
    } else {
        if node_coords_vec.len() != dimension {
            return Err(ParseError::Malformed(format!(
                "DIMENSION ({}) does not match the {} node coordinates found",
                dimension,
                node_coords_vec.len()
            )));
        }
        let metric: fn(&Node, &Node) -> f64 = match ewt {
            EdgeWeightType::Euc2D => calc_euc_2d_dist,
            EdgeWeightType::Ceil2D => calc_ceil_2d_dist,
            EdgeWeightType::Geo => calc_geo_dist,
            EdgeWeightType::Att => calc_att_dist,
            EdgeWeightType::Explicit => unreachable!("handled above"),
        };
        node_coords_vec
            .iter()
            .enumerate()
            .map(|(i, n1)| {
                node_coords_vec
                    .iter()
                    .enumerate()
                    .map(|(j, n2)| if i == j { 0.0 } else { metric(n1, n2) })
                    .collect()
            })
            .collect()
    };

    Ok(Instance {
        name,
        matrix: DistanceMatrix::new(dist_matrix)?,
    })
}

fn explicit_matrix(
    dimension: usize,
    format: EdgeWeightFormat,
    weights: &[f64],
) -> Result<Vec<Vec<f64>>, ParseError> {
    let expected = match format {
        EdgeWeightFormat::FullMatrix => dimension * dimension,
        EdgeWeightFormat::UpperRow => dimension * (dimension - 1) / 2,
        EdgeWeightFormat::LowerDiagRow => dimension * (dimension + 1) / 2,
    };
    if weights.len() != expected {
        return Err(ParseError::Malformed(format!(
            "EXPLICIT {:?}: expected {} weights, got {}",
            format,
            expected,
            weights.len()
        )));
    }

    let mut dist_matrix = vec![vec![0.0; dimension]; dimension];
    let mut k = 0;
    match format {
        EdgeWeightFormat::FullMatrix => {
            for row in dist_matrix.iter_mut() {
                for cell in row.iter_mut() {
                    *cell = weights[k];
                    k += 1;
                }
            }
        }
        EdgeWeightFormat::UpperRow => {
            for i in 0..dimension {
                for j in (i + 1)..dimension {
                    dist_matrix[i][j] = weights[k];
                    dist_matrix[j][i] = weights[k];
                    k += 1;
                }
            }
        }
        EdgeWeightFormat::LowerDiagRow => {
            for i in 0..dimension {
                for j in 0..=i {
                    dist_matrix[i][j] = weights[k];
                    dist_matrix[j][i] = weights[k];
                    k += 1;
                }
            }
        }
    }
    Ok(dist_matrix)
}

fn is_numeric_row(cells: &[String]) -> bool {
    cells.iter().all(|c| c.parse::<f64>().is_ok())
}

/// The first row is a header when its leading cell is empty (the pandas
/// `to_csv` layout), when it holds labels rather than numbers, or when
/// dropping it leaves a square block.
fn has_header_row(rows: &[(usize, Vec<String>)]) -> bool {
    let Some((_, first)) = rows.first() else {
        return false;
    };
    if first.first().is_some_and(|c| c.is_empty()) {
        return true;
    }
    let labelled = first.len() > 1 && is_numeric_row(&first[1..]);
    if !is_numeric_row(first) && !labelled {
        return true;
    }
    let width = first.len();
    rows.len() == width + 1 && rows.iter().all(|(_, cells)| cells.len() == width)
}

/// Parses a comma-separated distance matrix.
///
/// A header row and a leading label column are skipped when present. When
/// every data row has one cell more than there are rows, the first column
/// holds labels.
pub fn parse_csv_matrix(reader: impl BufRead) -> Result<DistanceMatrix, ParseError> {
    let mut rows: Vec<(usize, Vec<String>)> = Vec::new();
    for (idx, line_result) in reader.lines().enumerate() {
        let line = line_result.map_err(|e| ParseError::Syntax {
            line: idx + 1,
            message: format!("read error: {}", e),
        })?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        rows.push((
            idx + 1,
            line.split(',').map(|c| c.trim().to_string()).collect(),
        ));
    }

    if has_header_row(&rows) {
        rows.remove(0);
    }
    if rows.is_empty() {
        return Err(ParseError::Malformed("CSV matrix has no data rows".to_string()));
    }

    let n = rows.len();
    let has_label_column = rows.iter().all(|(_, cells)| cells.len() == n + 1);
    let skip = usize::from(has_label_column);

    let mut matrix = Vec::with_capacity(n);
    for (line, cells) in rows {
        let row = cells[skip..]
            .iter()
            .map(|c| {
                c.parse::<f64>().map_err(|e| ParseError::Syntax {
                    line,
                    message: format!("invalid distance '{}': {}", c, e),
                })
            })
            .collect::<Result<Vec<f64>, ParseError>>()?;
        matrix.push(row);
    }
    Ok(DistanceMatrix::new(matrix)?)
}
