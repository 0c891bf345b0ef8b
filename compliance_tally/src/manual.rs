/*!

This is the long-form manual for `compliance_tally` and `rcc`.

## Input format

`rcc` reads the responses of the observation form, exported from Google Forms
or Microsoft Forms as an Excel (.xlsx) file. Only two columns are used, by
position:

* column `H`: the name of the clinic where the observation was made
* column `I`: the date of the observation

The titles in the first row are not checked. The first row goes through the
same processing as all the other rows: since a title is not a date, the row
is dropped. Any row without a valid date is dropped, without an error.

Dates may be stored as real spreadsheet dates, as serial numbers, or as text
such as `2024-10-05`, `2024/10/05`, `10/05/2024` or `10/05/2024 14:30:00`.

## Fiscal quarters

The fiscal year starts in October:

| Quarter | Months |
|---------|--------------------------|
| Q1      | October, November, December |
| Q2      | January, February, March |
| Q3      | April, May, June |
| Q4      | July, August, September |

## Requirements

Each clinic has to perform a minimum number of observations every quarter
(see [`CLINIC_REQUIREMENTS`](crate::CLINIC_REQUIREMENTS)). The percentage met
for a clinic and a quarter is the number of observations divided by the
requirement, capped at 100%.

Clinic names in the input must match the names of the table exactly. A name
that does not match (a typo, a new clinic) is not scored; `rcc` prints a
warning with all such names and their number of observations.

## Output

```text
| Location        | Q1  | Q2  | Q3 | Q4 |
|-----------------|-----|-----|----|----|
| Barton          | 20  | 0   | 0  | 0  |
| Circles of Care | 100 | 50  | 0  | 0  |
| ...             |     |     |    |    |
```

Every clinic of the table gets a row, even without any observation.

## Running

```bash
rcc -i 'Observation form (Responses).xlsx'
```

The report is written to the downloads folder of the user, as
`<input name>_RESULTS_<YYYY-MM-DD_HH-MM-SS>.xlsx`, and opened with the default
spreadsheet application. `--out-dir` changes the folder, `--no-open` skips
opening the report, and `--out summary.json` (or `--out stdout`) also writes
the results in JSON format.
*/
