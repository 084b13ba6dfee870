//! End-to-end ingestion tests: raw files on disk in, canonical records out.

use std::fs;
use std::path::Path;

use anyhow::Result;
use rust_xlsxwriter::Workbook;
use tempfile::tempdir;

use tj_payroll::extractors::ExtractorRegistry;
use tj_payroll::parsing::make_server_id;
use tj_payroll::schema::CanonicalRecord;

fn month_dir(root: &Path, tj: &str, ym: &str) -> std::path::PathBuf {
    let dir = root.join(tj).join(ym);
    fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn test_corrupt_file_does_not_poison_the_month() -> Result<()> {
    let root = tempdir()?;
    let dir = month_dir(root.path(), "TJRS", "2025-01");

    fs::write(dir.join("broken.csv"), b"\x00\x01\x02\nrubbish\n")?;
    fs::write(
        dir.join("folha.csv"),
        "nome;cargo;remuneração bruta;descontos\n\
         Maria da Silva;Analista;10.000,00;2.000,00\n\
         João Souza;Técnico;8.000,00;1.500,00\n",
    )?;

    let registry = ExtractorRegistry::new();
    let records = registry.fetch_month("TJRS", "2025-01", root.path())?;

    // Only the well-formed file contributes rows
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].server_name.as_deref(), Some("Maria da Silva"));
    assert_eq!(records[0].gross_pay, 10000.0);
    assert_eq!(records[0].deductions, 2000.0);
    // Net pay derived from gross minus deductions when the source has none
    assert_eq!(records[0].net_pay, 8000.0);
    assert_eq!(records[1].net_pay, 6500.0);
    Ok(())
}

#[test]
fn test_xlsx_merged_header_across_sheets() -> Result<()> {
    let root = tempdir()?;
    let dir = month_dir(root.path(), "TJPI", "2025-03");

    let mut workbook = Workbook::new();

    // A summary sheet with no recognizable header
    let resumo = workbook.add_worksheet();
    resumo.set_name("Resumo")?;
    resumo.write_string(0, 0, "Resumo da folha")?;
    resumo.write_string(1, 0, "gerado em")?;
    resumo.write_string(1, 1, "01/04/2025")?;

    // The payroll sheet: banner row, then a two-row merged header
    let folha = workbook.add_worksheet();
    folha.set_name("Folha")?;
    folha.write_string(0, 0, "Tribunal de Justiça do Piauí")?;
    folha.write_string(1, 0, "Nome")?;
    folha.write_string(1, 1, "Cargo")?;
    folha.write_string(1, 2, "Rendimentos")?;
    folha.write_string(1, 4, "Descontos")?;
    folha.write_string(1, 5, "Líquido")?;
    folha.write_string(2, 2, "Vencimento")?;
    folha.write_string(2, 3, "Vantagens")?;
    folha.write_string(2, 4, "Total")?;
    folha.write_string(3, 0, "Maria da Silva")?;
    folha.write_string(3, 1, "Analista")?;
    folha.write_number(3, 2, 9000.0)?;
    folha.write_number(3, 3, 500.0)?;
    folha.write_number(3, 4, 1200.0)?;
    folha.write_number(3, 5, 8300.0)?;
    folha.write_string(4, 0, "João Souza")?;
    folha.write_string(4, 1, "Técnico")?;
    folha.write_number(4, 2, 7000.0)?;
    folha.write_number(4, 3, 300.0)?;
    folha.write_number(4, 4, 1000.0)?;
    folha.write_number(4, 5, 6300.0)?;

    workbook.save(dir.join("folha.xlsx"))?;

    let registry = ExtractorRegistry::new();
    let records = registry.fetch_month("TJPI", "2025-03", root.path())?;

    assert_eq!(records.len(), 2);
    let maria = &records[0];
    assert_eq!(maria.server_name.as_deref(), Some("Maria da Silva"));
    assert_eq!(maria.role.as_deref(), Some("Analista"));
    // "Rendimentos Vencimento" maps as gross pay, "Vantagens" as benefits,
    // "Descontos Total" as deductions
    assert_eq!(maria.gross_pay, 9000.0);
    assert_eq!(maria.benefits, 500.0);
    assert_eq!(maria.deductions, 1200.0);
    assert_eq!(maria.net_pay, 8300.0);
    Ok(())
}

#[test]
fn test_json_lines_ingestion() -> Result<()> {
    let root = tempdir()?;
    let dir = month_dir(root.path(), "TJTO", "2025-02");
    fs::write(
        dir.join("folha.json"),
        "{\"nome\": \"Ana Costa\", \"cargo\": \"Juíza\", \"liquido\": 21500.75}\n\
         {\"nome\": \"Bruno Lima\", \"cargo\": \"Oficial\", \"liquido\": 5400.0}\n",
    )?;

    let registry = ExtractorRegistry::new();
    let records = registry.fetch_month("TJTO", "2025-02", root.path())?;

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].server_name.as_deref(), Some("Ana Costa"));
    assert_eq!(records[0].net_pay, 21500.75);
    assert_eq!(records[1].role.as_deref(), Some("Oficial"));
    Ok(())
}

#[test]
fn test_html_table_ingestion() -> Result<()> {
    let root = tempdir()?;
    let dir = month_dir(root.path(), "TJRS", "2025-04");
    fs::write(
        dir.join("portal.html"),
        "<html><body><h1>Transparência</h1><table>\
         <tr><th>nome</th><th>cargo</th><th>liquido</th></tr>\
         <tr><td>Carla Nunes</td><td>Escrivã</td><td>R$ 7.250,00</td></tr>\
         </table></body></html>",
    )?;

    let registry = ExtractorRegistry::new();
    let records = registry.fetch_month("TJRS", "2025-04", root.path())?;

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].server_name.as_deref(), Some("Carla Nunes"));
    assert_eq!(records[0].net_pay, 7250.0);
    Ok(())
}

#[test]
fn test_two_line_csv_header() -> Result<()> {
    let root = tempdir()?;
    let dir = month_dir(root.path(), "TJTO", "2025-05");
    fs::write(
        dir.join("folha.csv"),
        "Nome;Rendimentos;;;Descontos;\n\
         ;Vencimento;Vantagens;Total de Creditos;Previdência;Líquido\n\
         Pedro Alves;6.000,00;400,00;6.400,00;900,00;5.500,00\n",
    )?;

    let registry = ExtractorRegistry::new();
    let records = registry.fetch_month("TJTO", "2025-05", root.path())?;

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].server_name.as_deref(), Some("Pedro Alves"));
    assert_eq!(records[0].gross_pay, 6400.0);
    assert_eq!(records[0].deductions, 900.0);
    assert_eq!(records[0].net_pay, 5500.0);
    Ok(())
}

#[test]
fn test_garbage_in_every_format_never_panics() -> Result<()> {
    let root = tempdir()?;
    let dir = month_dir(root.path(), "TJRS", "2025-06");
    for ext in ["csv", "txt", "xlsx", "json", "html", "htm"] {
        fs::write(dir.join(format!("garbage.{ext}")), b"\x00\xff\xfeNOT A TABLE")?;
    }

    let registry = ExtractorRegistry::new();
    let records = registry.fetch_month("TJRS", "2025-06", root.path())?;
    assert!(records.is_empty());
    Ok(())
}

#[test]
fn test_server_id_is_stable_across_files_and_formats() -> Result<()> {
    let root = tempdir()?;
    let dir = month_dir(root.path(), "TJRS", "2025-07");
    fs::write(
        dir.join("a.csv"),
        "nome;liquido\nMaria da Silva;1.000,00\n",
    )?;
    fs::write(
        dir.join("b.json"),
        "{\"nome\": \"Maria da Silva\", \"liquido\": 1000.0}\n",
    )?;

    let registry = ExtractorRegistry::new();
    let records = registry.fetch_month("TJRS", "2025-07", root.path())?;

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].server_id.len(), 16);
    assert_eq!(records[0].server_id, records[1].server_id);
    assert_eq!(
        records[0].server_id,
        make_server_id("TJRS", "Maria da Silva", None)
    );
    // Records are not deduplicated across files
    let names: Vec<_> = records
        .iter()
        .filter_map(|r: &CanonicalRecord| r.server_name.as_deref())
        .collect();
    assert_eq!(names, vec!["Maria da Silva", "Maria da Silva"]);
    Ok(())
}
