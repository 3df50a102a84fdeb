//! Canned project layouts shared by several test modules.

use super::ProjectFixture;

/// `src/main.cpp` using `src/math` and `src/utils`, the latter also used by math.
///
/// ```text
/// src/main.cpp        -> "math/calculator.h", "utils/logger.h"
/// src/math/*.cpp      -> "calculator.h", "../utils/logger.h"
/// src/utils/*.cpp     -> "logger.h"
/// ```
pub fn multi_module() -> ProjectFixture {
    ProjectFixture::new()
        .file(
            "src/main.cpp",
            "#include <iostream>\n\
             #include \"math/calculator.h\"\n\
             #include \"utils/logger.h\"\n\
             \n\
             int main() {\n\
             \x20   Logger logger;\n\
             \x20   Calculator calc;\n\
             \x20   logger.log(std::to_string(calc.add(10, 5)));\n\
             \x20   return 0;\n\
             }\n",
        )
        .file(
            "src/math/calculator.h",
            "#pragma once\nclass Calculator {\npublic:\n    int add(int a, int b);\n};\n",
        )
        .file(
            "src/math/calculator.cpp",
            "#include \"calculator.h\"\n#include \"../utils/logger.h\"\n\n\
             int Calculator::add(int a, int b) { Logger().log(\"add\"); return a + b; }\n",
        )
        .file(
            "src/utils/logger.h",
            "#pragma once\n#include <string>\nclass Logger {\npublic:\n    void log(const std::string& m);\n};\n",
        )
        .file(
            "src/utils/logger.cpp",
            "#include \"logger.h\"\n#include <iostream>\n\n\
             void Logger::log(const std::string& m) { std::cout << m << std::endl; }\n",
        )
}

/// Two modules whose headers include each other.
pub fn mutual_modules() -> ProjectFixture {
    ProjectFixture::new()
        .file("x/x.h", "#pragma once\n#include \"y/y.h\"\n")
        .file("x/x.c", "#include \"x.h\"\nvoid x(void) {}\n")
        .file("y/y.h", "#pragma once\n#include \"x/x.h\"\n")
        .file("y/y.c", "#include \"y.h\"\nvoid y(void) {}\n")
}

/// `count` sibling directories, each with an unrelated source/header pair.
pub fn disjoint_modules(count: usize) -> ProjectFixture {
    (0..count).fold(ProjectFixture::new(), |fixture, i| {
        fixture
            .file(format!("mod{i}/mod{i}.h"), &format!("int f{i}(void);\n"))
            .file(
                format!("mod{i}/mod{i}.c"),
                &format!("#include \"mod{i}.h\"\nint f{i}(void) {{ return {i}; }}\n"),
            )
    })
}
