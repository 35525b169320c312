//! Shared test database: the Lisboa event (id 7) with two programs and three
//! races, of which 101 and 103 are published and 102 belongs to both programs.

use crate::store::{
    MemoryRecordStore, TABLE_EVENT, TABLE_EVENT_FILE, TABLE_EVENT_ORGANIZER, TABLE_ORGANIZER,
    TABLE_PROGRAM, TABLE_PROGRAM_RACE, TABLE_RACE, TABLE_RESULTS_FILE,
};

pub const DATABASE: &str = "db-2024";
pub const RESULTS_WORKBOOK: &str = "results-lisboa";

pub fn lisboa_store() -> MemoryRecordStore {
    MemoryRecordStore::new()
        .with_range(
            DATABASE,
            TABLE_EVENT,
            vec![
                vec!["id", "eventReference", "title", "startDate", "endDate", "city", "county", "district", "googleSheetID", "notes"],
                vec!["7", "2024-lisboa", "Triatlo de Lisboa", "01/06/2024", "02/06/2024", "Lisboa", "Lisboa", "Lisboa", RESULTS_WORKBOOK, "internal"],
                vec!["8", "2024-porto", "Triatlo do Porto", "15/07/2024", "15/07/2024", "Porto", "Porto", "Porto", "results-porto", ""],
                vec!["", "", "", "", "", "", "", "", "", ""],
            ],
        )
        .with_range(
            DATABASE,
            TABLE_PROGRAM,
            vec![
                vec!["id", "eventID", "sport", "distanceType", "swimDistance", "swimLaps", "firstRunDistance", "firstRunLaps", "bikeDistance", "bikeLaps", "runDistance", "runLaps", "secondRunDistance", "secondRunLaps"],
                vec!["2", "7", "Bike", "Sprint", "", "", "", "", "20", "4", "", "", "", ""],
                vec!["1", "7", "Swim", "Open Water", "1500", "2", "", "", "", "", "", "", "", ""],
                vec!["3", "8", "Triathlon", "Standard", "1500", "1", "", "", "40", "8", "10", "2", "", ""],
            ],
        )
        .with_range(
            DATABASE,
            TABLE_PROGRAM_RACE,
            vec![
                vec!["programID", "raceID"],
                vec!["1", "101"],
                vec!["1", "102"],
                vec!["2", "102"],
                vec!["2", "103"],
                vec!["3", "200"],
            ],
        )
        .with_range(
            DATABASE,
            TABLE_RACE,
            vec![
                vec!["id", "raceReference", "title", "subtitle", "resultsRangeName", "derivedResults", "programID", "headReferee"],
                vec!["103", "2024-lisboa-bike", "Ciclismo", "Elite", "ResultsBike", "FALSO", "2", "Rui"],
                vec!["101", "2024-lisboa-swim", "Águas Abertas", "Elite", "ResultsSwim", "VERDADEIRO", "1", "Ana"],
                vec!["102", "2024-lisboa-open", "Open", "Populares", "ResultsOpen", "FALSO", "", "Ana"],
                vec!["200", "2024-porto-standard", "Triatlo Standard", "Elite", "ResultsStandard", "FALSO", "3", "Rui"],
                vec!["300", "2024-orphan", "Sem programa", "", "ResultsOrphan", "FALSO", "", ""],
            ],
        )
        .with_range(
            DATABASE,
            TABLE_RESULTS_FILE,
            vec![
                vec!["raceID", "fileName"],
                vec!["101", "swim.pdf"],
                vec!["103", "bike.pdf"],
                vec!["101", "swim-splits.pdf"],
                vec!["200", "standard.pdf"],
            ],
        )
        .with_range(
            DATABASE,
            TABLE_EVENT_FILE,
            vec![
                vec!["eventID", "title", "fileName"],
                vec!["7", "Regulamento", "regulamento.pdf"],
                vec!["8", "Regulamento", "regulamento-porto.pdf"],
            ],
        )
        .with_range(
            DATABASE,
            TABLE_EVENT_ORGANIZER,
            vec![vec!["eventID", "organizerID"], vec!["7", "1"], vec!["8", "2"]],
        )
        .with_range(
            DATABASE,
            TABLE_ORGANIZER,
            vec![vec!["id", "name"], vec!["1", "Clube de Lisboa"], vec!["2", "Clube do Porto"]],
        )
        .with_range(
            RESULTS_WORKBOOK,
            "ResultsSwim",
            vec![
                vec!["position", "athlete", "time"],
                vec!["1", "Maria Silva", "00:19:58"],
                vec!["2", "João Costa", "00:20:41"],
            ],
        )
        .with_range(
            RESULTS_WORKBOOK,
            "ResultsBike",
            vec![vec!["position", "athlete", "time"], vec!["1", "Pedro Reis", "00:31:10"]],
        )
        .with_range(
            RESULTS_WORKBOOK,
            "ResultsOpen",
            vec![vec!["position", "athlete", "time"], vec!["1", "Rita Lopes", "01:02:03"]],
        )
}

/// Database holding only the header of the event table.
pub fn empty_store() -> MemoryRecordStore {
    MemoryRecordStore::new().with_range(
        DATABASE,
        TABLE_EVENT,
        vec![vec!["id", "eventReference", "title", "startDate", "endDate", "city", "county", "district", "googleSheetID"]],
    )
}
