// Endpoint descriptors: one immutable entry per remote action. The
// transport only ever builds requests from these, so adding an operation
// means adding a row here plus a thin typed wrapper in `resources`.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    pub fn as_reqwest(self) -> reqwest::Method {
        match self {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
        }
    }
}

/// Shape the caller expects the reply to be coerced into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Dict,
    List,
    None,
    Lines,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoint {
    /// Controller path segment, e.g. `organism`.
    pub resource: &'static str,
    /// Action name appended to the resource, e.g. `addOrganismWithSequence`.
    pub name: &'static str,
    pub method: Method,
    /// Parameter names the action accepts. Credentials are not listed.
    pub params: &'static [&'static str],
    /// Multipart file fields. A non-empty list makes the request multipart.
    pub files: &'static [&'static str],
    pub shape: Shape,
}

impl Endpoint {
    pub fn path(&self) -> String {
        format!("{}/{}", self.resource, self.name)
    }

    pub fn accepts(&self, param: &str) -> bool {
        self.params.iter().any(|p| *p == param)
    }

    pub fn is_multipart(&self) -> bool {
        !self.files.is_empty()
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.resource, self.name)
    }
}

const fn post(
    resource: &'static str,
    name: &'static str,
    params: &'static [&'static str],
    shape: Shape,
) -> Endpoint {
    Endpoint {
        resource,
        name,
        method: Method::Post,
        params,
        files: &[],
        shape,
    }
}

const ORGANISM: &str = "organism";
const ANNOTATION_EDITOR: &str = "annotationEditor";
const CANNED_VALUE: &str = "cannedValue";
const AVAILABLE_STATUS: &str = "availableStatus";
const USER: &str = "user";

pub const ADD_ORGANISM: Endpoint = Endpoint {
    resource: ORGANISM,
    name: "addOrganismWithSequence",
    method: Method::Post,
    params: &[
        "commonName",
        "blatdb",
        "genus",
        "species",
        "publicMode",
        "nonDefaultTranslationTable",
        "metadata",
    ],
    files: &["organismData"],
    shape: Shape::List,
};
pub const FIND_ALL_ORGANISMS: Endpoint = post(
    ORGANISM,
    "findAllOrganisms",
    &["organism"],
    Shape::List,
);
pub const DELETE_ORGANISM: Endpoint = post(
    ORGANISM,
    "deleteOrganismWithSequence",
    &["organism"],
    Shape::Dict,
);
pub const ADD_TRACK: Endpoint = Endpoint {
    resource: ORGANISM,
    name: "addTrackToOrganism",
    method: Method::Post,
    params: &["organism", "trackConfig"],
    files: &["trackData"],
    shape: Shape::Dict,
};
pub const UPDATE_TRACK: Endpoint = post(
    ORGANISM,
    "updateTrackForOrganism",
    &["organism", "trackConfig"],
    Shape::Dict,
);
pub const DELETE_TRACK: Endpoint = post(
    ORGANISM,
    "deleteTrackFromOrganism",
    &["organism", "trackLabel"],
    Shape::Dict,
);

pub const GET_SEQUENCE_ALTERATIONS: Endpoint = post(
    ANNOTATION_EDITOR,
    "getSequenceAlterations",
    &["organism", "sequence"],
    Shape::List,
);
pub const GET_FEATURES: Endpoint = post(
    ANNOTATION_EDITOR,
    "getFeatures",
    &["organism", "sequence"],
    Shape::Dict,
);
pub const GET_GFF3: Endpoint = post(
    ANNOTATION_EDITOR,
    "getGff3",
    &["features", "organism", "sequence"],
    Shape::Lines,
);

pub const SHOW_VALUE: Endpoint = post(CANNED_VALUE, "showValue", &[], Shape::List);
pub const CREATE_VALUE: Endpoint = post(
    CANNED_VALUE,
    "createValue",
    &["value", "metadata"],
    Shape::Dict,
);
pub const UPDATE_VALUE: Endpoint = post(
    CANNED_VALUE,
    "updateValue",
    &["id", "new_value", "metadata"],
    Shape::Dict,
);
pub const DELETE_VALUE: Endpoint = post(CANNED_VALUE, "deleteValue", &["id"], Shape::Dict);

pub const SHOW_STATUS: Endpoint = post(AVAILABLE_STATUS, "showStatus", &[], Shape::List);
pub const CREATE_STATUS: Endpoint = post(AVAILABLE_STATUS, "createStatus", &["value"], Shape::Dict);
pub const UPDATE_STATUS: Endpoint = post(
    AVAILABLE_STATUS,
    "updateStatus",
    &["id", "new_value"],
    Shape::Dict,
);
pub const DELETE_STATUS: Endpoint = post(AVAILABLE_STATUS, "deleteStatus", &["id"], Shape::Dict);

pub const LOAD_USERS: Endpoint = post(USER, "loadUsers", &["userId"], Shape::List);

/// Every endpoint the resource modules use.
pub const ENDPOINTS: &[Endpoint] = &[
    ADD_ORGANISM,
    FIND_ALL_ORGANISMS,
    DELETE_ORGANISM,
    ADD_TRACK,
    UPDATE_TRACK,
    DELETE_TRACK,
    GET_SEQUENCE_ALTERATIONS,
    GET_FEATURES,
    GET_GFF3,
    SHOW_VALUE,
    CREATE_VALUE,
    UPDATE_VALUE,
    DELETE_VALUE,
    SHOW_STATUS,
    CREATE_STATUS,
    UPDATE_STATUS,
    DELETE_STATUS,
    LOAD_USERS,
];
