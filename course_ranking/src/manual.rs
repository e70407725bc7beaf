/*!

This is the long-form manual for `course_ranking` and `corerank`.

## What it does

Graduate program exit surveys ask students to rank the core courses of the
program by how beneficial they were. Every course gets its own column in the
survey export, with a header such as:

```text
MAcc CORE 601 - Most Beneficial
```

`corerank` finds these columns, turns them into one (course, rank) observation
per answer, and reports the average rank and the number of answers per course.
A lower average rank means a more beneficial course.

## Input

An Excel workbook (`.xlsx`). The first row of the worksheet holds the question
headers, every following row is one respondent. By default the first worksheet
is read; use `--excel-worksheet-name` to pick another one.

A column is used if its header contains all of `MAcc`, `CORE` and
`Most Beneficial`, in any case and with any amount of whitespace between the
words. The run fails if no column qualifies.

Cells that are blank or that do not hold a number (`N/A`, free text, dates) are
not errors: they are skipped, and their count is reported as
`Observations dropped`.

## Course names

The course name is derived from the header:

| Header                                    | Course              |
|-------------------------------------------|---------------------|
| `MAcc CORE 601 - Most Beneficial`         | `601`               |
| `CORE: Auditing — Most Beneficial Rank`   | `Auditing`          |
| `MAcc Core Tax \| most beneficial`        | `Tax`               |
| `Core Taxation - Rank`                    | `Taxation`          |

Everything from "most beneficial" onwards is removed, then the leading
`MAcc CORE`, `MAcc Core`, `CORE` or `Core` marker, then a trailing `- rank`.
Only these exact capitalizations of the marker are removed. If nothing is
left, the full header is used as the name. Columns that end up with the same
name are merged into one course.

## Output

Both files are overwritten at every run.

- `outputs/core_course_ranking.csv`:

  ```text
  course,avg_rank,n_responses
  Tax,2.00,3
  Audit,2.00,2
  ```

  Sorted by average rank, then by number of answers (more answers first), then
  by name. The averages are rounded to two decimals, ties to even.

- `outputs/rank_order.png`: a horizontal bar chart with the best ranked course
  at the top.

Pass `--reference <csv>` to compare the CSV with the output of a previous run;
the run fails and prints a diff if they differ. Pass `--summary <file>` (or
`--summary stdout`) to also get a JSON summary of the run.

*/
