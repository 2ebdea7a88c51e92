use test_support::{BIN, cmd_bin};

#[test]
fn cli_generates_man_page() {
  let out = cmd_bin(BIN).args(["--gen-man"]).output().unwrap();
  assert!(out.status.success());
  let s = String::from_utf8_lossy(&out.stdout);
  // clap_mangen emits a roff manpage starting with .TH and mentions the binary name
  assert!(s.contains(".TH") || s.contains(".Nm"));
  assert!(s.contains("workforce-metrics"));
}

#[test]
fn gen_man_needs_no_sources() {
  // --time-entries is only required once real work starts
  cmd_bin(BIN).arg("--gen-man").assert().success();
}
