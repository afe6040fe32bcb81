use stream_sieve::io::arc_table::ArcTableReader;
use stream_sieve::io::dhsvm::{ArcTableWriter, ConvergenceWriter, StreamNetworkWriter};
use stream_sieve::prelude::*;

const TABLE: &str = "\
# arcid from to length dz local maxgrid
arcid,from_node,to_node,Shape_Length,dz,local,maxgrid
1,10,20,400.0,2.0,100,0
2,11,20,300.0,1.0,50,0
3,20,30,900.0,0.9,,150
";

#[test]
fn read_derive_write_stream_network() {
    let net = ArcTableReader.read_network(TABLE.as_bytes()).unwrap();
    assert_eq!(net.len(), 3);
    assert_eq!(net.get(ArcId::new(3)).unwrap().local_area, 0.0);

    let out = net.derive(&EngineConfig::default()).unwrap();
    let text = StreamNetworkWriter::new()
        .with_save_outlets(true)
        .write_to_string(&out)
        .unwrap();
    let rows: Vec<Vec<&str>> = text.lines().map(|l| l.split_whitespace().collect()).collect();

    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0][..2], ["1", "1"]);
    assert_eq!(rows[0][5], "3");
    assert_eq!(rows[2][..2], ["3", "2"]);
    assert_eq!(rows[2][5], "-1");
    assert_eq!(rows[2].last(), Some(&"SAVE"));
}

#[test]
fn convergence_and_arc_table_agree_with_links() {
    let out = ArcTableReader
        .read_network(TABLE.as_bytes())
        .unwrap()
        .derive(&EngineConfig::default())
        .unwrap();

    let conv = ConvergenceWriter.write_to_string(&out).unwrap();
    assert_eq!(conv.lines().nth(2), Some("3 -1 900.000 2 1 2"));

    let table = ArcTableWriter.write_to_string(&out).unwrap();
    let header: Vec<&str> = table.lines().next().unwrap().split_whitespace().collect();
    let order_col = header.iter().position(|h| *h == "order").unwrap();
    let orders: Vec<&str> = table
        .lines()
        .skip(1)
        .map(|l| l.split_whitespace().nth(order_col).unwrap())
        .collect();
    assert_eq!(orders, ["1", "1", "2"]);
}

#[test]
fn parse_errors_carry_line_numbers() {
    let text = "id from_node to_node length elev_drop local_area maxgrid\n\n1 2 3 4 5 6\n";
    match ArcTableReader.read_records(text.as_bytes()) {
        Err(NetworkError::ArcTableParse { line, .. }) => assert_eq!(line, 3),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn config_loads_from_json() {
    let cfg: EngineConfig =
        serde_json::from_str(r#"{ "cell_size": 10.0, "downstream_policy": "Reject" }"#).unwrap();
    assert_eq!(cfg.cell_area(), 100.0);
    assert_eq!(cfg.downstream_policy, DownstreamPolicy::Reject);
    assert_eq!(cfg.slope_floor, 0.00001);
}
