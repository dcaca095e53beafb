use seekcare_datasets::{load_survey, Error, SURVEY_COLUMNS};

fn write_survey(dir: &std::path::Path, rows: &[&str]) -> std::path::PathBuf {
    let path = dir.join("survey.csv");
    let mut csv = String::from("Timestamp,");
    csv.push_str(&SURVEY_COLUMNS.join(","));
    csv.push_str(",comments\n");
    for row in rows {
        csv.push_str(row);
        csv.push('\n');
    }

    std::fs::write(&path, csv).unwrap();
    path
}

#[test]
fn survey_file_is_loaded_and_encoded() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_survey(
        dir.path(),
        &[
            "2014-08-27,37,United States,No,No,6-25,Yes,No,Yes,NA",
            "2014-08-27,44,United Kingdom,NA,No,26-100,Yes,Don't know,No,",
            "2014-08-27,32,Canada,Yes,Yes,More than 1000,No,Yes,No,NA",
            "2014-08-28,31,United Kingdom,No,Yes,1-5,Yes,No,Yes,hard to say",
        ],
    );

    let dataset = load_survey(&path).unwrap();

    // the comment column is not projected, so its missing values do not matter
    assert_eq!(dataset.records().nrows(), 3);
    assert_eq!(dataset.targets().len(), 3);

    let names = dataset.feature_names();
    assert_eq!(names[0], "Age");
    assert!(names.contains(&"Country_United Kingdom".to_string()));
    assert!(names.contains(&"no_employees_More than 1000".to_string()));
    assert!(!names.contains(&"wellness_program_Don't know".to_string()));
    assert!(!names.iter().any(|x| x.starts_with("treatment")));
}

#[test]
fn survey_without_a_required_column_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("survey.csv");
    std::fs::write(&path, "Age,Country,treatment\n30,Canada,Yes\n").unwrap();

    let res = load_survey(&path);

    assert!(matches!(
        res,
        Err(Error::Seekcare(seekcare::error::Error::MissingColumn(_)))
    ));
}

#[test]
fn unreadable_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();

    let res = load_survey(dir.path().join("absent.csv"));

    assert!(matches!(res, Err(Error::Io(_))));
}
