use chorus_pro_rs::{ApiRequest, Error, FluxSyntax, SubmitFlux};
use miette::{GraphicalReportHandler, GraphicalTheme, Result};

mod test_utils;

fn render(error: &Error) -> String {
    let mut out = String::new();
    GraphicalReportHandler::new_themed(GraphicalTheme::unicode_nocolor())
        .with_width(200)
        .render_report(&mut out, error)
        .unwrap();
    out
}

#[test]
fn crate_errors_propagate_into_miette_result() -> Result<()> {
    test_utils::do_setup();
    let syntax: FluxSyntax = "IN_DP_E2_CII_FACTURX".parse()?;
    assert_eq!(syntax, FluxSyntax::InDpE2CiiFacturx);

    let unknown: Result<FluxSyntax> = "IN_DP_E9".parse::<FluxSyntax>().map_err(Into::into);
    let report = unknown.unwrap_err();
    assert_eq!(
        report.code().map(|code| code.to_string()).as_deref(),
        Some("chorus_pro_rs::invalid_argument")
    );
    Ok(())
}

#[test]
fn missing_field_report_shows_code_and_help() {
    test_utils::do_setup();
    let mut request = SubmitFlux::new();
    request.set_flux_file(test_utils::fixture_invoice()).unwrap();

    let err = request.post_fields().unwrap_err();
    let report = render(&err);

    assert!(report.contains("chorus_pro_rs::missing_field"), "{report}");
    assert!(report.contains("you must provide a value for field `syntaxeFlux`"), "{report}");
    assert!(
        report.contains("Set every required field of the request before executing it"),
        "{report}"
    );
}
