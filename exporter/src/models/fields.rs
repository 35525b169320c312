//! Column names of the competition database and the field sets built on them.

pub const ID: &str = "id";
pub const EVENT_ID: &str = "eventID";
pub const PROGRAM_ID: &str = "programID";
pub const RACE_ID: &str = "raceID";
pub const ORGANIZER_ID: &str = "organizerID";

pub const EVENT_REFERENCE: &str = "eventReference";
pub const RACE_REFERENCE: &str = "raceReference";
pub const TITLE: &str = "title";
pub const SUBTITLE: &str = "subtitle";

/// Event column naming the workbook that holds the results ranges.
pub const RESULTS_WORKBOOK: &str = "googleSheetID";
/// Race column naming its results range inside that workbook.
pub const RESULTS_RANGE_NAME: &str = "resultsRangeName";
pub const DERIVED_RESULTS: &str = "derivedResults";

pub const EVENT_FILES: &str = "eventFiles";
pub const ORGANIZERS: &str = "organizers";
pub const PROGRAMS: &str = "programs";
pub const RACES: &str = "races";
pub const RESULTS_FILES: &str = "resultsFiles";
pub const RESULTS: &str = "results";

/// Event columns exposed by the loader.
pub const EVENT_FIELDS: &[&str] = &[
    ID,
    EVENT_REFERENCE,
    TITLE,
    "startDate",
    "endDate",
    "city",
    "county",
    "district",
    RESULTS_WORKBOOK,
];

/// Race columns never exposed.
pub const RACE_HIDDEN_FIELDS: &[&str] = &[
    "championships",
    "technicalDelegate",
    "headReferee",
    "competitionJury",
    RESULTS,
];

/// Race columns coerced to booleans.
pub const RACE_BOOLEAN_FIELDS: &[&str] = &[DERIVED_RESULTS];

/// Program fields copied onto a race that belongs to a single program.
pub const FLATTENED_PROGRAM_FIELDS: &[&str] = &[
    EVENT_ID,
    "sport",
    "distanceType",
    "swimDistance",
    "swimLaps",
    "firstRunDistance",
    "firstRunLaps",
    "bikeDistance",
    "bikeLaps",
    "runDistance",
    "runLaps",
    "secondRunDistance",
    "secondRunLaps",
];

/// Program columns exposed by the loader.
pub const PROGRAM_FIELDS: &[&str] = &[
    ID,
    EVENT_ID,
    "sport",
    "distanceType",
    "swimDistance",
    "swimLaps",
    "firstRunDistance",
    "firstRunLaps",
    "bikeDistance",
    "bikeLaps",
    "runDistance",
    "runLaps",
    "secondRunDistance",
    "secondRunLaps",
];

/// Race fields kept in the race list of an event artifact.
pub const RACE_SUMMARY_FIELDS: &[&str] = &[ID, RACE_REFERENCE, TITLE, SUBTITLE];
