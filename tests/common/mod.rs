#![allow(dead_code)]

use std::io::{Cursor, Write};

use zip::ZipWriter;
use zip::write::SimpleFileOptions;

pub fn zip_bytes(members: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, body) in members {
        writer
            .start_file(*name, SimpleFileOptions::default())
            .unwrap();
        writer.write_all(body).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

pub const NATIONAL: &str = "INDICATOR_ID,COUNTRY_ID,YEAR,VALUE,MAGNITUDE,QUALIFIER
GER.1,ARG,2015,110.5,,
GER.1,KWT,2015,95.2,,
MYS.1T8,ARG,2016,10.1,,
SAP.1,ARG,2015,4000000,,
GER.1,ARG,2016,111.0,,
";

pub const REGIONAL: &str = "INDICATOR_ID,REGION_ID,YEAR,VALUE,MAGNITUDE,QUALIFIER
GER.1,WB: World,2015,101.0,,
GER.1,SDG: Africa,2015,99.0,,
";

pub const LABEL: &str = "INDICATOR_ID,INDICATOR_LABEL_EN
GER.1,\"Gross enrolment ratio, primary\"
MYS.1T8,Mean years of schooling
SAP.1,School age population
";

pub const COUNTRY: &str = "COUNTRY_ID,COUNTRY_NAME_EN
ARG,Argentina
KWT,Kuwait
";

pub const REGION: &str = "REGION_ID,COUNTRY_ID,COUNTRY_NAME_EN
WB: World,ARG,Argentina
WB: World,KWT,Kuwait
SDG: Africa,KWT,Kuwait
";

pub const METADATA: &str = "INDICATOR_ID,COUNTRY_ID,YEAR,TYPE,METADATA
GER.1,ARG,2015,Source:Data sources,UIS questionnaire
GER.1,ARG,2015,Source:Data sources,National census
GER.1,ARG,2015,Under Coverage:Students or individuals,Excludes private schools
SAP.1,ARG,2015,Source:Data sources,UN Population Division
";

pub const README: &str = "SDG bulk data download service\n";

pub fn sdg_archive() -> Vec<u8> {
    zip_bytes(&[
        ("SDG_DATA_NATIONAL.csv", NATIONAL.as_bytes()),
        ("SDG_DATA_REGIONAL.csv", REGIONAL.as_bytes()),
        ("SDG_LABEL.csv", LABEL.as_bytes()),
        ("SDG_COUNTRY.csv", COUNTRY.as_bytes()),
        ("SDG_REGION.csv", REGION.as_bytes()),
        ("SDG_METADATA.csv", METADATA.as_bytes()),
        ("SDG_README.md", README.as_bytes()),
    ])
}
