error_chain! {
    types {
        Error, ErrorKind, ResultExt, Result;
    }

    foreign_links {
        Io(::std::io::Error);
        Regex(::regex::Error);
        WalkDir(::walkdir::Error);
        Term(::term::Error);
        Persist(::tempfile::PersistError);
    }

    errors {
        MissingOption(name: String) {
            description("missing required option")
            display("option '{}' is missing", name)
        }
        UnreadableTestbase(path: String, reason: String) {
            description("testbase does not exist or could not be read")
            display("testbase '{}' was not existing or could not be read: {}", path, reason)
        }
        AmbiguousExpectation(class: String, method: String, kinds: Vec<String>) {
            description("more than one expected exception declared")
            display("{}->{} declares more than one expected exception: {}", class, method, kinds.join(", "))
        }
        AmbiguousOperation(name: String, first: String, second: String) {
            description("assertion is ambiguous")
            display("assertion '{}' is ambiguous: provided by both '{}' and '{}'", name, first, second)
        }
        UndefinedOperation(name: String) {
            description("assertion is not defined")
            display("assertion '{}' is not defined by any registered provider", name)
        }
        UnattributedAssertion(class: String) {
            description("assertion could not be attributed to a call site")
            display("no assertive frame found while recording an assertion in '{}'", class)
        }
        Report(reason: String) {
            description("failed to produce test report")
            display("failed to produce test report: {}", reason)
        }
    }
}
