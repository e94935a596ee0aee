use std::fs;
use std::path::PathBuf;

use aco_tsp::parser::load_instance;
use aco_tsp::{Config, InputFormat, ParseError, run, solve};

fn scratch_file(name: &str, contents: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("aco-tsp-tests-{}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path
}

const PENTAGON_TSP: &str = "NAME : pentagon
TYPE : TSP
DIMENSION : 5
EDGE_WEIGHT_TYPE : EUC_2D
NODE_COORD_SECTION
1 0 100
2 95 31
3 59 -81
4 -59 -81
5 -95 31
EOF
";

#[test]
fn loads_tsplib_by_extension_and_solves() {
    let path = scratch_file("pentagon.tsp", PENTAGON_TSP);
    let instance = load_instance(&path, InputFormat::Auto).unwrap();
    assert_eq!(instance.name, "pentagon");
    assert_eq!(instance.matrix.len(), 5);

    let config = Config::build([
        "aco-tsp",
        path.to_str().unwrap(),
        "--iters",
        "60",
        "--seed",
        "3",
    ])
    .unwrap();
    let solution = solve(&instance.matrix, &config.aco).unwrap();
    // the pentagon perimeter is the unique optimum
    assert_eq!(
        solution.best_tour.canonical().cities(),
        &[0, 1, 2, 3, 4][..]
    );
}

#[test]
fn loads_labelled_csv() {
    let path = scratch_file(
        "cities.csv",
        ",a,b,c,d\na,0,1,1.5,1\nb,1,0,1,1.5\nc,1.5,1,0,1\nd,1,1.5,1,0\n",
    );
    let instance = load_instance(&path, InputFormat::Auto).unwrap();
    assert_eq!(instance.name, "cities");
    assert_eq!(instance.matrix.distance(0, 2), 1.5);
}

#[test]
fn forced_format_overrides_extension() {
    let path = scratch_file("matrix.txt", "0,3\n3,0\n");
    let instance = load_instance(&path, InputFormat::Csv).unwrap();
    assert_eq!(instance.matrix.distance(1, 0), 3.0);
    assert!(load_instance(&path, InputFormat::Tsplib).is_err());
}

#[test]
fn missing_file_is_an_io_error() {
    let path = std::env::temp_dir().join("aco-tsp-tests-does-not-exist.tsp");
    assert!(matches!(
        load_instance(&path, InputFormat::Auto),
        Err(ParseError::Io { .. })
    ));
}

#[test]
fn run_writes_tour_and_history_files() {
    let input = scratch_file(
        "square.csv",
        ",0,1,2,3\n0,0,1,1.5,1\n1,1,0,1,1.5\n2,1.5,1,0,1\n3,1,1.5,1,0\n",
    );
    let tour_path = input.with_file_name("square-tour.txt");
    let history_path = input.with_file_name("square-history.csv");
    let config = Config::build([
        "aco-tsp",
        input.to_str().unwrap(),
        "--iters",
        "20",
        "--seed",
        "1",
        "--tour-out",
        tour_path.to_str().unwrap(),
        "--history-out",
        history_path.to_str().unwrap(),
    ])
    .unwrap();
    run(&config).unwrap();

    let tour = fs::read_to_string(&tour_path).unwrap();
    assert_eq!(tour, "0\n1\n2\n3\n");
    let history = fs::read_to_string(&history_path).unwrap();
    let lines: Vec<&str> = history.lines().collect();
    assert_eq!(lines[0], "iteration,best_length");
    assert_eq!(lines.len(), 21);
    assert_eq!(lines[20], "19,4");
}
